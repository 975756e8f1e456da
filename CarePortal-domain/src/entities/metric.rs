use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::errors::PortalError;
use super::alert::Alert;

/// Store name of the compound blood pressure metric
pub const BLOOD_PRESSURE: &str = "blood_pressure";

/// A single scalar health metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    BloodPressureSystolic,
    BloodPressureDiastolic,
    HeartRate,
    Weight,
    BloodGlucose,
}

impl MetricType {
    /// Every metric, in display order
    pub const ALL: [MetricType; 5] = [
        MetricType::BloodPressureSystolic,
        MetricType::BloodPressureDiastolic,
        MetricType::HeartRate,
        MetricType::Weight,
        MetricType::BloodGlucose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::BloodPressureSystolic => "blood_pressure_systolic",
            MetricType::BloodPressureDiastolic => "blood_pressure_diastolic",
            MetricType::HeartRate => "heart_rate",
            MetricType::Weight => "weight",
            MetricType::BloodGlucose => "blood_glucose",
        }
    }

    /// Unit the value is recorded in
    pub fn unit(&self) -> &'static str {
        match self {
            MetricType::BloodPressureSystolic | MetricType::BloodPressureDiastolic => "mmHg",
            MetricType::HeartRate => "bpm",
            MetricType::Weight => "kg",
            MetricType::BloodGlucose => "mg/dL",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            MetricType::BloodPressureSystolic => "Systolic blood pressure",
            MetricType::BloodPressureDiastolic => "Diastolic blood pressure",
            MetricType::HeartRate => "Heart rate",
            MetricType::Weight => "Weight",
            MetricType::BloodGlucose => "Blood glucose",
        }
    }

    /// Plausible range accepted when recording a reading
    pub fn accepted_range(&self) -> (f64, f64) {
        match self {
            MetricType::BloodPressureSystolic => (40.0, 300.0),
            MetricType::BloodPressureDiastolic => (20.0, 200.0),
            MetricType::HeartRate => (20.0, 250.0),
            MetricType::Weight => (1.0, 500.0),
            MetricType::BloodGlucose => (10.0, 1000.0),
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricType {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricType::ALL
            .iter()
            .copied()
            .find(|metric| metric.as_str() == s)
            .ok_or_else(|| PortalError::UnrecognizedMetric(s.to_string()))
    }
}

/// A timestamped health reading.
///
/// Blood pressure is the only compound metric; every other metric carries one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reading {
    BloodPressure {
        systolic: f64,
        diastolic: f64,
        recorded_at: DateTime<Utc>,
    },
    Scalar {
        metric_type: MetricType,
        value: f64,
        recorded_at: DateTime<Utc>,
    },
}

impl Reading {
    pub fn recorded_at(&self) -> DateTime<Utc> {
        match self {
            Reading::BloodPressure { recorded_at, .. } | Reading::Scalar { recorded_at, .. } => *recorded_at,
        }
    }

    /// Scalar samples carried by this reading; blood pressure yields two
    pub fn samples(&self) -> Vec<(MetricType, f64)> {
        match self {
            Reading::BloodPressure { systolic, diastolic, .. } => vec![
                (MetricType::BloodPressureSystolic, *systolic),
                (MetricType::BloodPressureDiastolic, *diastolic),
            ],
            Reading::Scalar { metric_type, value, .. } => vec![(*metric_type, *value)],
        }
    }

    /// Metric type name used by the metric store
    pub fn store_metric_type(&self) -> &'static str {
        match self {
            Reading::BloodPressure { .. } => BLOOD_PRESSURE,
            Reading::Scalar { metric_type, .. } => metric_type.as_str(),
        }
    }
}

/// Value of a reading as submitted by a client
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(untagged)]
pub enum ReadingValue {
    BloodPressure { systolic: f64, diastolic: f64 },
    Scalar(f64),
}

/// Request payload for recording a new reading
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[validate(schema(function = "validate_reading_value", skip_on_field_errors = false))]
pub struct CreateReadingRequest {
    /// Patient the reading belongs to
    #[validate(length(min = 1, max = 128, message = "Patient id must be between 1 and 128 characters"))]
    pub patient_id: String,

    /// `blood_pressure` or one of the scalar metric names
    #[validate(length(min = 1, message = "Metric type is required"))]
    pub metric_type: String,

    /// A number, or `{systolic, diastolic}` for blood pressure
    pub value: ReadingValue,

    /// When the reading was taken. Defaults to now.
    pub recorded_at: Option<DateTime<Utc>>,

    /// Optional notes about the reading
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

fn value_error(message: String) -> ValidationError {
    let mut error = ValidationError::new("value");
    error.message = Some(Cow::from(message));
    error
}

fn check_range(metric: MetricType, value: f64) -> Result<(), ValidationError> {
    let (min, max) = metric.accepted_range();
    if !value.is_finite() || value < min || value > max {
        return Err(value_error(format!(
            "{} must be between {} and {} {}",
            metric.label(),
            min,
            max,
            metric.unit()
        )));
    }
    Ok(())
}

/// The value shape must match the metric type and fall in its accepted range
fn validate_reading_value(request: &CreateReadingRequest) -> Result<(), ValidationError> {
    match (request.metric_type.as_str(), request.value) {
        (BLOOD_PRESSURE, ReadingValue::BloodPressure { systolic, diastolic }) => {
            check_range(MetricType::BloodPressureSystolic, systolic)?;
            check_range(MetricType::BloodPressureDiastolic, diastolic)?;
            if systolic <= diastolic {
                return Err(value_error(
                    "Systolic pressure must be greater than diastolic pressure".to_string(),
                ));
            }
            Ok(())
        }
        (BLOOD_PRESSURE, ReadingValue::Scalar(_)) => Err(value_error(
            "Blood pressure needs both systolic and diastolic values".to_string(),
        )),
        (name, ReadingValue::Scalar(value)) => {
            let metric: MetricType = name
                .parse()
                .map_err(|_| value_error(format!("Unknown metric type: {}", name)))?;
            if matches!(metric, MetricType::BloodPressureSystolic | MetricType::BloodPressureDiastolic) {
                return Err(value_error(format!(
                    "Record {} as part of a blood_pressure reading",
                    name
                )));
            }
            check_range(metric, value)
        }
        (name, ReadingValue::BloodPressure { .. }) => Err(value_error(format!(
            "{} takes a single numeric value",
            name
        ))),
    }
}

/// A reading after it has been stored, with the alert it raised, if any
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct RecordedReading {
    pub id: String,
    pub reading: Reading,
    pub alert: Option<Alert>,
}
