use axum::extract::Json;
use tracing::instrument;

use care_portal_domain::entities::{CarbonCalculation, CarbonComparisonRequest};
use care_portal_domain::services::advisor;
use care_portal_domain::PortalError;

use crate::entities::common::ErrorResponse;

/// Carbon and water saved by switching activities
#[utoipa::path(
    post,
    path = "/api/v1/sustainability/carbon",
    request_body = CarbonComparisonRequest,
    responses(
        (status = 200, description = "Savings for the switch", body = CarbonCalculation),
        (status = 400, description = "Unknown or incomparable activities", body = ErrorResponse),
    ),
    tag = "sustainability"
)]
#[instrument]
pub async fn calculate_carbon(
    Json(request): Json<CarbonComparisonRequest>,
) -> Result<Json<CarbonCalculation>, ErrorResponse> {
    advisor::calculate_savings(&request.current_activity, &request.alternative_activity, request.quantity)
        .map(Json)
        .map_err(|e| match e {
            PortalError::Validation(msg) => ErrorResponse::validation_error(
                &msg,
                Some(serde_json::json!({ "known_activities": advisor::known_activities() })),
            ),
            other => ErrorResponse::from(other),
        })
}
