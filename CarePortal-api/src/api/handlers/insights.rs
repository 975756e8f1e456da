use axum::extract::{Json, Path, Query, State};
use tracing::{debug, info, instrument};

use care_portal_domain::entities::InsightSummary;
use care_portal_domain::PortalConfig;

use crate::api::routes::{InsightServiceHandle, MetricServiceHandle};
use crate::entities::common::{ErrorResponse, InsightQueryParams, WindowQueryParams};
use crate::entities::readings::TrendListResponse;

/// Per-metric trends over the lookback window
#[utoipa::path(
    get,
    path = "/api/v1/patients/{patient_id}/trends",
    params(
        ("patient_id" = String, Path, description = "Patient identifier"),
        WindowQueryParams
    ),
    responses(
        (status = 200, description = "Trends for metrics with enough readings", body = TrendListResponse),
        (status = 503, description = "Metric store unavailable", body = ErrorResponse),
    ),
    tag = "insights"
)]
#[instrument(skip(service, config))]
pub async fn get_trends(
    State(service): State<MetricServiceHandle>,
    State(config): State<PortalConfig>,
    Path(patient_id): Path<String>,
    Query(params): Query<WindowQueryParams>,
) -> Result<Json<TrendListResponse>, ErrorResponse> {
    let lookback_days = config.resolve_lookback(params.days);
    let trends = service.get_trends(&patient_id, Some(lookback_days)).await?;

    Ok(Json(TrendListResponse {
        patient_id,
        lookback_days,
        trends,
    }))
}

/// Alert counts, severity-ordered alerts and trend breakdown for the dashboard
#[utoipa::path(
    get,
    path = "/api/v1/patients/{patient_id}/insights",
    params(
        ("patient_id" = String, Path, description = "Patient identifier"),
        InsightQueryParams
    ),
    responses(
        (status = 200, description = "Insight summary", body = InsightSummary),
        (status = 503, description = "Metric or alert store unavailable", body = ErrorResponse),
    ),
    tag = "insights"
)]
#[instrument(skip(service))]
pub async fn get_insights(
    State(service): State<InsightServiceHandle>,
    Path(patient_id): Path<String>,
    Query(params): Query<InsightQueryParams>,
) -> Result<Json<InsightSummary>, ErrorResponse> {
    if params.cached.unwrap_or(false) {
        if let Some(summary) = service.cached_insights(&patient_id, params.days) {
            debug!("Serving cached insight summary");
            return Ok(Json(summary));
        }
    }

    let summary = service.get_insights(&patient_id, params.days).await?;
    info!(
        unread = summary.unread_count,
        urgent = summary.has_urgent_unread,
        "Insight summary built"
    );
    Ok(Json(summary))
}
