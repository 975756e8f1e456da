use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use care_portal_domain::entities::{Alert, AlertSeverity};

/// Active alerts for a patient
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AlertListResponse {
    pub patient_id: String,
    pub unread_count: usize,
    /// Newest first
    pub alerts: Vec<Alert>,
}

/// Ad hoc threshold check.
///
/// Scalar metrics take `value`; `blood_pressure` takes `systolic` and `diastolic`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EvaluateAlertRequest {
    #[schema(example = "heart_rate")]
    pub metric_type: String,
    pub value: Option<f64>,
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
}

/// Result of a threshold check
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EvaluateAlertResponse {
    pub metric_type: String,
    /// Absent when the value is in range or the metric has no thresholds
    pub severity: Option<AlertSeverity>,
}
