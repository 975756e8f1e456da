use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, instrument, warn};

use care_portal_domain::entities::RecordedReading;
use care_portal_domain::PortalConfig;

use crate::api::routes::{InsightServiceHandle, MetricServiceHandle};
use crate::entities::common::{ErrorResponse, WindowQueryParams};
use crate::entities::readings::{ReadingListResponse, RecordReadingRequest};

/// Record a reading and evaluate it against the alert thresholds
#[utoipa::path(
    post,
    path = "/api/v1/patients/{patient_id}/readings",
    params(
        ("patient_id" = String, Path, description = "Patient identifier")
    ),
    request_body = RecordReadingRequest,
    responses(
        (status = 201, description = "Reading recorded", body = RecordedReading),
        (status = 400, description = "Invalid reading", body = ErrorResponse),
        (status = 503, description = "Metric store unavailable", body = ErrorResponse),
    ),
    tag = "readings"
)]
#[instrument(skip(service, insights, request))]
pub async fn record_reading(
    State(service): State<MetricServiceHandle>,
    State(insights): State<InsightServiceHandle>,
    Path(patient_id): Path<String>,
    Json(request): Json<RecordReadingRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    info!("Recording {} reading", request.metric_type);

    let recorded = service
        .record_reading(request.into_domain(patient_id.clone()))
        .await
        .map_err(|e| {
            warn!("Failed to record reading: {}", e);
            ErrorResponse::from(e)
        })?;
    insights.invalidate(&patient_id);

    Ok((StatusCode::CREATED, Json(recorded)))
}

/// Readings inside the lookback window, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/patients/{patient_id}/readings",
    params(
        ("patient_id" = String, Path, description = "Patient identifier"),
        WindowQueryParams
    ),
    responses(
        (status = 200, description = "Readings in the window", body = ReadingListResponse),
        (status = 503, description = "Metric store unavailable", body = ErrorResponse),
    ),
    tag = "readings"
)]
#[instrument(skip(service, config))]
pub async fn get_readings(
    State(service): State<MetricServiceHandle>,
    State(config): State<PortalConfig>,
    Path(patient_id): Path<String>,
    Query(params): Query<WindowQueryParams>,
) -> Result<Json<ReadingListResponse>, ErrorResponse> {
    let lookback_days = config.resolve_lookback(params.days);
    let readings = service.get_readings(&patient_id, Some(lookback_days)).await?;
    info!("Returning {} readings", readings.len());

    Ok(Json(ReadingListResponse {
        patient_id,
        lookback_days,
        readings,
    }))
}
