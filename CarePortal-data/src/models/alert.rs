use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Storage model for a patient alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// Unique identifier for the alert
    pub id: String,

    /// Patient the alert belongs to
    pub patient_id: String,

    /// Severity name as stored ("low", "medium", "high", "critical")
    pub severity: String,

    /// Short title shown in the alert list
    pub title: String,

    /// Longer description
    pub message: String,

    /// Metric that triggered the alert, if any
    pub metric_type: Option<String>,

    /// Whether the alert has been read
    pub is_read: bool,

    /// When the alert was created
    pub created_at: DateTime<Utc>,

    /// When the alert stops being shown; `None` never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl AlertRecord {
    /// Whether the alert is still visible at `now`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |expires_at| expires_at > now)
    }
}

/// Input data for storing a new alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAlertRecord {
    pub patient_id: String,
    pub severity: String,
    pub title: String,
    pub message: String,
    pub metric_type: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}
