use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::warn;

use care_portal_data::models::alert::{AlertRecord, NewAlertRecord};
use care_portal_data::models::metric::{MetricRecord, NewMetricRecord};

use crate::errors::PortalError;
use super::alert::{Alert, AlertSeverity};
use super::metric::{CreateReadingRequest, MetricType, Reading, ReadingValue, BLOOD_PRESSURE};

/// Conversion functions between domain entities and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]

fn number(value: &serde_json::Value, field: &str, record_id: &str) -> Result<f64, PortalError> {
    value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PortalError::Validation(format!("Record {} has a non-numeric {}", record_id, field)))
}

/// Convert a stored metric record to a reading.
///
/// This is the only place the stored value shape is inspected.
pub fn convert_to_domain_reading(record: &MetricRecord) -> Result<Reading, PortalError> {
    if record.metric_type == BLOOD_PRESSURE {
        let systolic = number(&record.value["systolic"], "systolic", &record.id)?;
        let diastolic = number(&record.value["diastolic"], "diastolic", &record.id)?;
        return Ok(Reading::BloodPressure {
            systolic,
            diastolic,
            recorded_at: record.recorded_at,
        });
    }

    let metric_type: MetricType = record.metric_type.parse()?;
    if matches!(metric_type, MetricType::BloodPressureSystolic | MetricType::BloodPressureDiastolic) {
        return Err(PortalError::UnrecognizedMetric(format!(
            "{} is not stored as a scalar metric",
            metric_type
        )));
    }
    Ok(Reading::Scalar {
        metric_type,
        value: number(&record.value, "value", &record.id)?,
        recorded_at: record.recorded_at,
    })
}

/// Convert stored records, skipping any the domain cannot interpret
pub fn convert_to_domain_readings(records: &[MetricRecord]) -> Vec<Reading> {
    records
        .iter()
        .filter_map(|record| match convert_to_domain_reading(record) {
            Ok(reading) => Some(reading),
            Err(e) => {
                warn!("Skipping metric record {}: {}", record.id, e);
                None
            }
        })
        .collect()
}

/// Build the reading described by a validated create request
pub fn convert_to_domain_reading_from_request(
    request: &CreateReadingRequest,
    now: DateTime<Utc>,
) -> Result<Reading, PortalError> {
    let recorded_at = request.recorded_at.unwrap_or(now);
    match (request.metric_type.as_str(), request.value) {
        (BLOOD_PRESSURE, ReadingValue::BloodPressure { systolic, diastolic }) => Ok(Reading::BloodPressure {
            systolic,
            diastolic,
            recorded_at,
        }),
        (name, ReadingValue::Scalar(value)) if name != BLOOD_PRESSURE => Ok(Reading::Scalar {
            metric_type: name.parse()?,
            value,
            recorded_at,
        }),
        (name, _) => Err(PortalError::Validation(format!(
            "Value shape does not match metric type {}",
            name
        ))),
    }
}

/// Convert a reading to the data model used by the metric store
pub fn convert_to_data_new_metric(
    patient_id: &str,
    reading: &Reading,
    notes: Option<String>,
) -> NewMetricRecord {
    let value = match reading {
        Reading::BloodPressure { systolic, diastolic, .. } => json!({
            "systolic": systolic,
            "diastolic": diastolic,
        }),
        Reading::Scalar { value, .. } => json!(value),
    };

    NewMetricRecord {
        patient_id: patient_id.to_string(),
        metric_type: reading.store_metric_type().to_string(),
        value,
        recorded_at: reading.recorded_at(),
        notes,
    }
}

/// Convert a stored alert record to a domain alert
pub fn convert_to_domain_alert(record: AlertRecord) -> Result<Alert, PortalError> {
    let severity: AlertSeverity = record.severity.parse()?;
    let metric_type = record
        .metric_type
        .as_deref()
        .and_then(|name| name.parse::<MetricType>().ok());

    Ok(Alert {
        id: record.id,
        patient_id: record.patient_id,
        severity,
        title: record.title,
        message: record.message,
        metric_type,
        is_read: record.is_read,
        created_at: record.created_at,
        expires_at: record.expires_at,
    })
}

/// Convert stored alerts, skipping records with an unknown severity
pub fn convert_to_domain_alerts(records: Vec<AlertRecord>) -> Vec<Alert> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id.clone();
            match convert_to_domain_alert(record) {
                Ok(alert) => Some(alert),
                Err(e) => {
                    warn!("Skipping alert record {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

/// Convert a generated alert to the data model used by the alert store
pub fn convert_to_data_new_alert(
    patient_id: &str,
    severity: AlertSeverity,
    metric_type: MetricType,
    title: String,
    message: String,
    expires_at: Option<DateTime<Utc>>,
) -> NewAlertRecord {
    NewAlertRecord {
        patient_id: patient_id.to_string(),
        severity: severity.as_str().to_string(),
        title,
        message,
        metric_type: Some(metric_type.as_str().to_string()),
        expires_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(metric_type: &str, value: serde_json::Value) -> MetricRecord {
        MetricRecord {
            id: "m1".to_string(),
            patient_id: "p1".to_string(),
            metric_type: metric_type.to_string(),
            value,
            recorded_at: Utc::now(),
            notes: None,
        }
    }

    #[test]
    fn test_blood_pressure_record_resolves_to_compound_reading() {
        let reading = convert_to_domain_reading(&record(BLOOD_PRESSURE, json!({"systolic": 142, "diastolic": 91}))).unwrap();
        assert!(matches!(reading, Reading::BloodPressure { systolic, diastolic, .. } if systolic == 142.0 && diastolic == 91.0));
    }

    #[test]
    fn test_malformed_records_are_rejected() {
        assert!(convert_to_domain_reading(&record(BLOOD_PRESSURE, json!(120))).is_err());
        assert!(convert_to_domain_reading(&record("heart_rate", json!({"bpm": 70}))).is_err());
        assert!(matches!(
            convert_to_domain_reading(&record("steps", json!(9000))),
            Err(PortalError::UnrecognizedMetric(_))
        ));
    }

    #[test]
    fn test_convert_readings_skips_bad_records() {
        let records = vec![
            record("heart_rate", json!(72)),
            record("steps", json!(9000)),
            record("weight", json!(81.2)),
        ];
        assert_eq!(convert_to_domain_readings(&records).len(), 2);
    }

    #[test]
    fn test_new_metric_value_shape() {
        let reading = Reading::BloodPressure { systolic: 120.0, diastolic: 80.0, recorded_at: Utc::now() };
        let data = convert_to_data_new_metric("p1", &reading, None);
        assert_eq!(data.metric_type, BLOOD_PRESSURE);
        assert_eq!(data.value["systolic"], json!(120.0));

        let round_trip = convert_to_domain_reading(&MetricRecord {
            id: "m2".to_string(),
            patient_id: data.patient_id,
            metric_type: data.metric_type,
            value: data.value,
            recorded_at: data.recorded_at,
            notes: data.notes,
        })
        .unwrap();
        assert_eq!(round_trip, reading);
    }

    #[test]
    fn test_alert_with_unknown_severity_is_skipped() {
        let make = |id: &str, severity: &str| AlertRecord {
            id: id.to_string(),
            patient_id: "p1".to_string(),
            severity: severity.to_string(),
            title: "t".to_string(),
            message: "m".to_string(),
            metric_type: Some("heart_rate".to_string()),
            is_read: false,
            created_at: Utc::now(),
            expires_at: None,
        };
        let alerts = convert_to_domain_alerts(vec![make("a1", "high"), make("a2", "severe")]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].metric_type, Some(MetricType::HeartRate));
    }
}
