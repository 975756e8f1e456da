use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::errors::PortalError;
use super::metric::MetricType;

/// Alert severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        }
    }

    /// High and critical alerts need prompt attention
    pub fn is_urgent(&self) -> bool {
        *self >= AlertSeverity::High
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertSeverity {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(AlertSeverity::Low),
            "medium" => Ok(AlertSeverity::Medium),
            "high" => Ok(AlertSeverity::High),
            "critical" => Ok(AlertSeverity::Critical),
            other => Err(PortalError::Validation(format!("Unknown alert severity: {}", other))),
        }
    }
}

/// A patient alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Alert {
    /// Unique identifier for the alert
    pub id: String,

    /// Patient the alert belongs to
    pub patient_id: String,

    pub severity: AlertSeverity,

    /// Short headline
    pub title: String,

    /// Full alert text
    pub message: String,

    /// Metric that triggered the alert, if any
    pub metric_type: Option<MetricType>,

    /// Whether the patient has acknowledged the alert
    pub is_read: bool,

    pub created_at: DateTime<Utc>,

    /// Alerts are hidden once this passes
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of a bulk mark-as-read.
///
/// Alerts are updated one at a time, so some can succeed while others fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MarkAllReadOutcome {
    /// Ids that are now read
    pub updated: Vec<String>,

    /// Ids the store failed to update
    pub failed: Vec<String>,
}

impl MarkAllReadOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
