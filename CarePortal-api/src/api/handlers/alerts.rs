use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, instrument, warn};

use care_portal_domain::entities::metric::BLOOD_PRESSURE;
use care_portal_domain::entities::MarkAllReadOutcome;
use care_portal_domain::services::thresholds::{evaluate_blood_pressure, evaluate_named};

use crate::api::routes::{AlertServiceHandle, InsightServiceHandle};
use crate::entities::alerts::{AlertListResponse, EvaluateAlertRequest, EvaluateAlertResponse};
use crate::entities::common::ErrorResponse;

/// Active alerts for a patient, newest first
#[utoipa::path(
    get,
    path = "/api/v1/patients/{patient_id}/alerts",
    params(
        ("patient_id" = String, Path, description = "Patient identifier")
    ),
    responses(
        (status = 200, description = "Active alerts", body = AlertListResponse),
        (status = 503, description = "Alert store unavailable", body = ErrorResponse),
    ),
    tag = "alerts"
)]
#[instrument(skip(service))]
pub async fn get_alerts(
    State(service): State<AlertServiceHandle>,
    Path(patient_id): Path<String>,
) -> Result<Json<AlertListResponse>, ErrorResponse> {
    let alerts = service.get_active_alerts(&patient_id).await?;
    let unread_count = alerts.iter().filter(|alert| !alert.is_read).count();

    Ok(Json(AlertListResponse {
        patient_id,
        unread_count,
        alerts,
    }))
}

/// Mark a single alert as read
#[utoipa::path(
    post,
    path = "/api/v1/alerts/{id}/read",
    params(
        ("id" = String, Path, description = "Alert identifier")
    ),
    responses(
        (status = 204, description = "Alert marked as read"),
        (status = 404, description = "Alert not found", body = ErrorResponse),
        (status = 503, description = "Alert store unavailable", body = ErrorResponse),
    ),
    tag = "alerts"
)]
#[instrument(skip(service, insights))]
pub async fn mark_alert_read(
    State(service): State<AlertServiceHandle>,
    State(insights): State<InsightServiceHandle>,
    Path(id): Path<String>,
) -> Result<StatusCode, ErrorResponse> {
    service.mark_read(&id).await?;
    // The alert id does not name its patient
    insights.invalidate_all();
    Ok(StatusCode::NO_CONTENT)
}

/// Mark every unread alert as read.
///
/// Responds 207 when some alerts could not be updated.
#[utoipa::path(
    post,
    path = "/api/v1/patients/{patient_id}/alerts/read-all",
    params(
        ("patient_id" = String, Path, description = "Patient identifier")
    ),
    responses(
        (status = 200, description = "All unread alerts marked as read", body = MarkAllReadOutcome),
        (status = 207, description = "Some alerts could not be updated", body = MarkAllReadOutcome),
        (status = 503, description = "Alert store unavailable", body = ErrorResponse),
    ),
    tag = "alerts"
)]
#[instrument(skip(service, insights))]
pub async fn mark_all_alerts_read(
    State(service): State<AlertServiceHandle>,
    State(insights): State<InsightServiceHandle>,
    Path(patient_id): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let outcome = service.mark_all_read(&patient_id).await?;
    insights.invalidate(&patient_id);
    let status = if outcome.is_complete() {
        StatusCode::OK
    } else {
        warn!("{} alerts could not be marked as read", outcome.failed.len());
        StatusCode::MULTI_STATUS
    };
    Ok((status, Json(outcome)))
}

/// Evaluate a value against the alert thresholds without storing anything
#[utoipa::path(
    post,
    path = "/api/v1/alerts/evaluate",
    request_body = EvaluateAlertRequest,
    responses(
        (status = 200, description = "Severity for the value, if any", body = EvaluateAlertResponse),
        (status = 400, description = "Missing value", body = ErrorResponse),
    ),
    tag = "alerts"
)]
#[instrument]
pub async fn evaluate_alert(
    Json(request): Json<EvaluateAlertRequest>,
) -> Result<Json<EvaluateAlertResponse>, ErrorResponse> {
    let severity = if request.metric_type == BLOOD_PRESSURE {
        match (request.systolic, request.diastolic) {
            (Some(systolic), Some(diastolic)) => evaluate_blood_pressure(systolic, diastolic),
            _ => {
                return Err(ErrorResponse::validation_error(
                    "Blood pressure needs both systolic and diastolic values",
                    None,
                ))
            }
        }
    } else {
        let value = request
            .value
            .ok_or_else(|| ErrorResponse::validation_error("value is required", None))?;
        evaluate_named(&request.metric_type, value)
    };

    info!("Evaluated {}: {:?}", request.metric_type, severity);
    Ok(Json(EvaluateAlertResponse {
        metric_type: request.metric_type,
        severity,
    }))
}
