//! Static alert thresholds per metric.

use tracing::warn;

use crate::entities::alert::AlertSeverity;
use crate::entities::alert::AlertSeverity::{Critical, High, Low, Medium};
use crate::entities::metric::{MetricType, Reading};

/// One side of a severity band
#[derive(Debug, Clone, Copy)]
enum Band {
    AtOrAbove(f64, AlertSeverity),
    AtOrBelow(f64, AlertSeverity),
}

impl Band {
    fn matches(&self, value: f64) -> Option<AlertSeverity> {
        match *self {
            Band::AtOrAbove(limit, severity) if value >= limit => Some(severity),
            Band::AtOrBelow(limit, severity) if value <= limit => Some(severity),
            _ => None,
        }
    }
}

const SYSTOLIC: &[Band] = &[
    Band::AtOrAbove(180.0, Critical),
    Band::AtOrAbove(160.0, High),
    Band::AtOrAbove(140.0, Medium),
    Band::AtOrAbove(130.0, Low),
];

const DIASTOLIC: &[Band] = &[
    Band::AtOrAbove(120.0, Critical),
    Band::AtOrAbove(100.0, High),
    Band::AtOrAbove(90.0, Medium),
    Band::AtOrAbove(80.0, Low),
];

const HEART_RATE: &[Band] = &[
    Band::AtOrAbove(150.0, Critical),
    Band::AtOrAbove(120.0, High),
    Band::AtOrAbove(100.0, Medium),
    Band::AtOrBelow(40.0, Critical),
    Band::AtOrBelow(45.0, High),
    Band::AtOrBelow(50.0, Medium),
];

// mg/dL
const BLOOD_GLUCOSE: &[Band] = &[
    Band::AtOrAbove(300.0, Critical),
    Band::AtOrAbove(250.0, High),
    Band::AtOrAbove(180.0, Medium),
    Band::AtOrAbove(140.0, Low),
    Band::AtOrBelow(54.0, Critical),
    Band::AtOrBelow(70.0, High),
];

fn bands(metric_type: MetricType) -> &'static [Band] {
    match metric_type {
        MetricType::BloodPressureSystolic => SYSTOLIC,
        MetricType::BloodPressureDiastolic => DIASTOLIC,
        MetricType::HeartRate => HEART_RATE,
        MetricType::BloodGlucose => BLOOD_GLUCOSE,
        MetricType::Weight => &[],
    }
}

/// Severity of a single value, or `None` when it is within normal range
pub fn evaluate_threshold(metric_type: MetricType, value: f64) -> Option<AlertSeverity> {
    bands(metric_type)
        .iter()
        .filter_map(|band| band.matches(value))
        .max()
}

/// Like [`evaluate_threshold`] for a metric given by name.
///
/// Unknown names are logged and produce no alert.
pub fn evaluate_named(metric_name: &str, value: f64) -> Option<AlertSeverity> {
    match metric_name.parse::<MetricType>() {
        Ok(metric_type) => evaluate_threshold(metric_type, value),
        Err(e) => {
            warn!("No thresholds for metric: {}", e);
            None
        }
    }
}

/// The worse of the systolic and diastolic severities
pub fn evaluate_blood_pressure(systolic: f64, diastolic: f64) -> Option<AlertSeverity> {
    evaluate_threshold(MetricType::BloodPressureSystolic, systolic)
        .max(evaluate_threshold(MetricType::BloodPressureDiastolic, diastolic))
}

/// Worst severity for a reading together with the metric that produced it
pub fn evaluate_reading(reading: &Reading) -> Option<(MetricType, AlertSeverity, f64)> {
    let mut worst: Option<(MetricType, AlertSeverity, f64)> = None;
    for (metric_type, value) in reading.samples() {
        if let Some(severity) = evaluate_threshold(metric_type, value) {
            if worst.map_or(true, |(_, current, _)| severity > current) {
                worst = Some((metric_type, severity, value));
            }
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_systolic_bands() {
        assert_eq!(evaluate_threshold(MetricType::BloodPressureSystolic, 185.0), Some(Critical));
        assert_eq!(evaluate_threshold(MetricType::BloodPressureSystolic, 145.0), Some(Medium));
        assert_eq!(evaluate_threshold(MetricType::BloodPressureSystolic, 110.0), None);
        assert_eq!(evaluate_threshold(MetricType::BloodPressureSystolic, 130.0), Some(Low));
    }

    #[test]
    fn test_low_side_bands() {
        assert_eq!(evaluate_threshold(MetricType::HeartRate, 38.0), Some(Critical));
        assert_eq!(evaluate_threshold(MetricType::HeartRate, 44.0), Some(High));
        assert_eq!(evaluate_threshold(MetricType::HeartRate, 72.0), None);
        assert_eq!(evaluate_threshold(MetricType::BloodGlucose, 60.0), Some(High));
        assert_eq!(evaluate_threshold(MetricType::BloodGlucose, 50.0), Some(Critical));
        assert_eq!(evaluate_threshold(MetricType::BloodGlucose, 95.0), None);
    }

    #[test]
    fn test_weight_never_alerts() {
        assert_eq!(evaluate_threshold(MetricType::Weight, 250.0), None);
    }

    #[test]
    fn test_unknown_metric_name_is_not_fatal() {
        assert_eq!(evaluate_named("cholesterol", 400.0), None);
        assert_eq!(evaluate_named("heart_rate", 155.0), Some(Critical));
    }

    #[test]
    fn test_blood_pressure_takes_the_worse_component() {
        assert_eq!(evaluate_blood_pressure(135.0, 105.0), Some(High));
        assert_eq!(evaluate_blood_pressure(118.0, 75.0), None);

        let reading = Reading::BloodPressure { systolic: 135.0, diastolic: 105.0, recorded_at: Utc::now() };
        assert_eq!(
            evaluate_reading(&reading),
            Some((MetricType::BloodPressureDiastolic, High, 105.0))
        );
    }
}
