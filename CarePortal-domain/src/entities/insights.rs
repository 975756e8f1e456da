use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::alert::Alert;
use super::metric::MetricType;

/// Direction of a metric over the lookback window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum TrendTag {
    Up,
    Down,
    Stable,
}

/// Trend of one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MetricTrend {
    pub metric_type: MetricType,

    pub tag: TrendTag,

    /// Signed percent change of the recent average against the baseline
    pub change_percent: f64,

    /// Mean of the most recent readings
    pub recent_average: f64,

    /// Mean of the readings before the recent ones
    pub baseline_average: f64,

    /// Readings considered in the window
    pub reading_count: usize,
}

/// Unread alert counts per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// How many metrics moved in each direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct TrendBreakdown {
    pub up: usize,
    pub down: usize,
    pub stable: usize,

    /// Share of classified metrics that are stable, 0 to 100. Zero when nothing was classified.
    pub stable_percent: f64,
}

/// Blood pressure category based on measurements
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum BloodPressureCategory {
    /// Normal blood pressure (systolic < 120 and diastolic < 80)
    Normal,

    /// Elevated blood pressure (systolic 120-129 and diastolic < 80)
    Elevated,

    /// Stage 1 Hypertension (systolic 130-139 or diastolic 80-89)
    Hypertension1,

    /// Stage 2 Hypertension (systolic ≥ 140 or diastolic ≥ 90)
    Hypertension2,

    /// Hypertensive crisis (systolic ≥ 180 or diastolic ≥ 120)
    HypertensiveCrisis,
}

impl BloodPressureCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BloodPressureCategory::Normal => "Normal",
            BloodPressureCategory::Elevated => "Elevated",
            BloodPressureCategory::Hypertension1 => "Hypertension Stage 1",
            BloodPressureCategory::Hypertension2 => "Hypertension Stage 2",
            BloodPressureCategory::HypertensiveCrisis => "Hypertensive Crisis",
        }
    }
}

/// Dashboard-ready view of a patient's alerts and trends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct InsightSummary {
    /// Number of unread alerts
    pub unread_count: usize,

    pub severity_counts: SeverityCounts,

    /// True when any unread alert is high or critical
    pub has_urgent_unread: bool,

    /// Alerts, most severe first. Equal severities keep their feed order.
    pub alerts: Vec<Alert>,

    /// Per-metric trends that could be classified
    pub trends: Vec<MetricTrend>,

    pub trend_breakdown: TrendBreakdown,

    /// Category of the latest blood pressure reading in the window
    pub blood_pressure_category: Option<BloodPressureCategory>,
}
