use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use utoipa::ToSchema;

use care_portal_domain::entities::{
    CreateReadingRequest, MetricTrend, Reading, ReadingValue,
};

/// Request payload for recording a reading
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordReadingRequest {
    /// `blood_pressure`, `heart_rate`, `weight` or `blood_glucose`
    #[schema(example = "blood_pressure")]
    pub metric_type: String,

    /// A number, or `{"systolic": .., "diastolic": ..}` for blood pressure
    pub value: ReadingValue,

    /// When the reading was taken. Defaults to now.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,

    /// Optional notes about the reading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RecordReadingRequest {
    /// Attach the patient from the request path
    pub fn into_domain(self, patient_id: String) -> CreateReadingRequest {
        CreateReadingRequest {
            patient_id,
            metric_type: self.metric_type,
            value: self.value,
            recorded_at: self.recorded_at,
            notes: self.notes,
        }
    }
}

/// Readings inside a lookback window
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadingListResponse {
    pub patient_id: String,
    pub lookback_days: u32,
    /// Oldest first
    pub readings: Vec<Reading>,
}

/// Trends inside a lookback window
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TrendListResponse {
    pub patient_id: String,
    pub lookback_days: u32,
    /// Only metrics with enough readings appear
    pub trends: Vec<MetricTrend>,
}
