use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Storage model for a health metric record.
///
/// The shape of `value` depends on `metric_type`: a JSON number for scalar
/// metrics, `{"systolic": .., "diastolic": ..}` for blood pressure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Unique identifier for the record
    pub id: String,

    /// Patient the measurement belongs to
    pub patient_id: String,

    /// Metric type name as stored (e.g. "heart_rate")
    pub metric_type: String,

    /// Raw measurement value
    pub value: serde_json::Value,

    /// When the measurement was taken
    pub recorded_at: DateTime<Utc>,

    /// Optional notes about the measurement
    pub notes: Option<String>,
}

/// Input data for storing a new health metric record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMetricRecord {
    pub patient_id: String,
    pub metric_type: String,
    pub value: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
    pub notes: Option<String>,
}
