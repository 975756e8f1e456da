use std::future::Future;
use std::time::Duration as StdDuration;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};
use validator::Validate;

use care_portal_data::repository::{AlertRepositoryTrait, MetricRepositoryTrait, RepositoryError};

use crate::config::{PortalConfig, MAX_ALERT_TTL_DAYS};
use crate::entities::alert::AlertSeverity;
use crate::entities::conversions;
use crate::entities::insights::MetricTrend;
use crate::entities::metric::{CreateReadingRequest, MetricType, Reading, RecordedReading};
use crate::errors::PortalError;
use crate::services::thresholds::evaluate_reading;
use crate::services::trends::analyze_trends;

/// Readings may be stamped slightly ahead of the server clock
const CLOCK_SKEW_MINUTES: i64 = 5;

/// Run a store call under `timeout`, treating expiry as a fetch failure
pub(crate) async fn with_timeout<T, F>(timeout: StdDuration, operation: &str, fut: F) -> Result<T, PortalError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(PortalError::from),
        Err(_) => {
            warn!("{} timed out after {} ms", operation, timeout.as_millis());
            Err(PortalError::FetchFailure(format!(
                "{} timed out after {} ms",
                operation,
                timeout.as_millis()
            )))
        }
    }
}

/// Flatten validator errors into one message
pub(crate) fn validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
                .collect();
            if *field == "__all__" {
                messages.join(", ")
            } else {
                format!("{}: {}", field, messages.join(", "))
            }
        })
        .collect::<Vec<String>>()
        .join("; ")
}

/// Trait for reading and trend operations
#[async_trait]
pub trait MetricServiceTrait {
    /// Validate a create reading request
    fn validate_create_request(&self, request: &CreateReadingRequest) -> Result<(), PortalError>;

    /// Store a reading and raise an alert when it crosses a threshold
    async fn record_reading(&self, request: CreateReadingRequest) -> Result<RecordedReading, PortalError>;

    /// Readings inside the lookback window, oldest first
    async fn get_readings(&self, patient_id: &str, lookback_days: Option<u32>) -> Result<Vec<Reading>, PortalError>;

    /// Trends for every metric with enough readings in the window
    async fn get_trends(&self, patient_id: &str, lookback_days: Option<u32>) -> Result<Vec<MetricTrend>, PortalError>;
}

/// Reading service over the metric and alert stores
pub struct MetricService<M: MetricRepositoryTrait, A: AlertRepositoryTrait> {
    metrics: M,
    alerts: A,
    config: PortalConfig,
}

impl<M: MetricRepositoryTrait, A: AlertRepositoryTrait> MetricService<M, A> {
    pub fn new(metrics: M, alerts: A, config: PortalConfig) -> Self {
        Self { metrics, alerts, config }
    }

    fn window_start(&self, lookback_days: Option<u32>) -> DateTime<Utc> {
        Utc::now() - Duration::days(self.config.resolve_lookback(lookback_days) as i64)
    }

    /// Expiry for an alert raised at `now`; the TTL is clamped to 1..=365 days
    fn alert_expiry(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let ttl_days = self.config.alert_ttl_days.clamp(1, MAX_ALERT_TTL_DAYS);
        now.checked_add_signed(Duration::days(ttl_days))
    }
}

fn alert_title(severity: AlertSeverity, metric_type: MetricType) -> String {
    let level = match severity {
        AlertSeverity::Critical => "Critical",
        AlertSeverity::High => "High",
        AlertSeverity::Medium => "Elevated",
        AlertSeverity::Low => "Borderline",
    };
    format!("{} {} reading", level, metric_type.label().to_lowercase())
}

fn alert_message(reading: &Reading, metric_type: MetricType, value: f64, severity: AlertSeverity) -> String {
    let measured = match reading {
        Reading::BloodPressure { systolic, diastolic, .. } => {
            format!("Blood pressure of {}/{} mmHg", systolic, diastolic)
        }
        Reading::Scalar { .. } => format!("{} of {} {}", metric_type.label(), value, metric_type.unit()),
    };
    let advice = match severity {
        AlertSeverity::Critical => "Seek medical attention immediately.",
        AlertSeverity::High => "Contact your care team today.",
        AlertSeverity::Medium => "Mention this at your next appointment.",
        AlertSeverity::Low => "Keep monitoring.",
    };
    format!(
        "{} recorded at {}. {}",
        measured,
        reading.recorded_at().format("%Y-%m-%d %H:%M UTC"),
        advice
    )
}

#[async_trait]
impl<M, A> MetricServiceTrait for MetricService<M, A>
where
    M: MetricRepositoryTrait + Send + Sync,
    A: AlertRepositoryTrait + Send + Sync,
{
    fn validate_create_request(&self, request: &CreateReadingRequest) -> Result<(), PortalError> {
        if let Err(validation_errors) = request.validate() {
            return Err(PortalError::Validation(validation_message(&validation_errors)));
        }

        if let Some(recorded_at) = request.recorded_at {
            if recorded_at > Utc::now() + Duration::minutes(CLOCK_SKEW_MINUTES) {
                return Err(PortalError::Validation(
                    "Reading time cannot be in the future".to_string(),
                ));
            }
        }

        Ok(())
    }

    async fn record_reading(&self, request: CreateReadingRequest) -> Result<RecordedReading, PortalError> {
        self.validate_create_request(&request)?;

        let now = Utc::now();
        let reading = conversions::convert_to_domain_reading_from_request(&request, now)?;
        let new_record = conversions::convert_to_data_new_metric(&request.patient_id, &reading, request.notes.clone());

        let stored = with_timeout(self.config.fetch_timeout, "store reading", self.metrics.create(new_record))
            .await
            .map_err(|e| {
                error!("Failed to store reading for patient {}: {}", request.patient_id, e);
                e
            })?;
        info!("Recorded {} reading {} for patient {}", stored.metric_type, stored.id, request.patient_id);

        let alert = match evaluate_reading(&reading) {
            Some((metric_type, severity, value)) => {
                let new_alert = conversions::convert_to_data_new_alert(
                    &request.patient_id,
                    severity,
                    metric_type,
                    alert_title(severity, metric_type),
                    alert_message(&reading, metric_type, value, severity),
                    self.alert_expiry(now),
                );
                // The reading is already stored; a failed alert write is logged, not returned
                match with_timeout(self.config.fetch_timeout, "store alert", self.alerts.create(new_alert)).await {
                    Ok(record) => {
                        warn!("Raised {} alert {} for patient {}", severity, record.id, request.patient_id);
                        match conversions::convert_to_domain_alert(record) {
                            Ok(alert) => Some(alert),
                            Err(e) => {
                                error!("Stored alert for patient {} could not be read back: {}", request.patient_id, e);
                                None
                            }
                        }
                    }
                    Err(e) => {
                        error!("Failed to store {} alert for patient {}: {}", severity, request.patient_id, e);
                        None
                    }
                }
            }
            None => None,
        };

        Ok(RecordedReading {
            id: stored.id,
            reading,
            alert,
        })
    }

    async fn get_readings(&self, patient_id: &str, lookback_days: Option<u32>) -> Result<Vec<Reading>, PortalError> {
        let since = self.window_start(lookback_days);
        let records = with_timeout(
            self.config.fetch_timeout,
            "fetch readings",
            self.metrics.get_since(patient_id, since),
        )
        .await?;
        Ok(conversions::convert_to_domain_readings(&records))
    }

    async fn get_trends(&self, patient_id: &str, lookback_days: Option<u32>) -> Result<Vec<MetricTrend>, PortalError> {
        let window_start = self.window_start(lookback_days);
        let readings = self.get_readings(patient_id, lookback_days).await?;
        Ok(analyze_trends(&readings, window_start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::metric::ReadingValue;
    use crate::entities::insights::TrendTag;
    use care_portal_data::repository::mock::{MockAlertRepository, MockMetricRepository};

    fn request(metric_type: &str, value: ReadingValue, days_ago: i64) -> CreateReadingRequest {
        CreateReadingRequest {
            patient_id: "p1".to_string(),
            metric_type: metric_type.to_string(),
            value,
            recorded_at: Some(Utc::now() - Duration::days(days_ago)),
            notes: None,
        }
    }

    fn service() -> MetricService<MockMetricRepository, MockAlertRepository> {
        MetricService::new(MockMetricRepository::new(), MockAlertRepository::new(), PortalConfig::default())
    }

    #[tokio::test]
    async fn test_record_normal_reading_raises_no_alert() {
        let service = service();
        let recorded = service
            .record_reading(request("heart_rate", ReadingValue::Scalar(72.0), 0))
            .await
            .unwrap();
        assert!(recorded.alert.is_none());
        assert!(matches!(recorded.reading, Reading::Scalar { metric_type: MetricType::HeartRate, .. }));
    }

    #[tokio::test]
    async fn test_record_critical_blood_pressure_raises_alert() {
        let service = service();
        let recorded = service
            .record_reading(request("blood_pressure", ReadingValue::BloodPressure { systolic: 185.0, diastolic: 95.0 }, 0))
            .await
            .unwrap();
        let alert = recorded.alert.expect("alert raised");
        assert_eq!(alert.severity, AlertSeverity::Critical);
        assert_eq!(alert.metric_type, Some(MetricType::BloodPressureSystolic));
        assert!(alert.message.contains("185/95"));
        assert!(!alert.is_read);
        let expires_at = alert.expires_at.expect("alert expires");
        assert!(expires_at > Utc::now() + Duration::days(6));
    }

    #[tokio::test]
    async fn test_alert_store_failure_keeps_reading() {
        let service = MetricService::new(
            MockMetricRepository::new(),
            MockAlertRepository::unreachable(),
            PortalConfig::default(),
        );
        let recorded = service
            .record_reading(request("blood_glucose", ReadingValue::Scalar(320.0), 0))
            .await
            .unwrap();
        assert!(recorded.alert.is_none());
        assert_eq!(service.get_readings("p1", None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_stored_alert_keeps_reading() {
        let service = MetricService::new(
            MockMetricRepository::new(),
            MockAlertRepository::corrupting(),
            PortalConfig::default(),
        );
        let recorded = service
            .record_reading(request("heart_rate", ReadingValue::Scalar(160.0), 0))
            .await
            .unwrap();
        assert!(recorded.alert.is_none());
        assert_eq!(service.get_readings("p1", None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_alert_ttl_is_clamped() {
        let huge = MetricService::new(
            MockMetricRepository::new(),
            MockAlertRepository::new(),
            PortalConfig { alert_ttl_days: 1_000_000_000, ..PortalConfig::default() },
        );
        let recorded = huge
            .record_reading(request("heart_rate", ReadingValue::Scalar(160.0), 0))
            .await
            .unwrap();
        let expires_at = recorded.alert.and_then(|a| a.expires_at).expect("alert expires");
        assert!(expires_at <= Utc::now() + Duration::days(MAX_ALERT_TTL_DAYS));

        let negative = MetricService::new(
            MockMetricRepository::new(),
            MockAlertRepository::new(),
            PortalConfig { alert_ttl_days: -3, ..PortalConfig::default() },
        );
        let recorded = negative
            .record_reading(request("heart_rate", ReadingValue::Scalar(160.0), 0))
            .await
            .unwrap();
        let expires_at = recorded.alert.and_then(|a| a.expires_at).expect("alert expires");
        assert!(expires_at > Utc::now());
    }

    #[tokio::test]
    async fn test_invalid_requests_are_rejected() {
        let service = service();
        let future = CreateReadingRequest {
            recorded_at: Some(Utc::now() + Duration::days(1)),
            ..request("weight", ReadingValue::Scalar(80.0), 0)
        };
        assert!(matches!(service.record_reading(future).await, Err(PortalError::Validation(_))));

        let inverted = request("blood_pressure", ReadingValue::BloodPressure { systolic: 70.0, diastolic: 90.0 }, 0);
        let err = service.record_reading(inverted).await.unwrap_err();
        assert!(err.to_string().contains("Systolic pressure must be greater"));
    }

    #[tokio::test]
    async fn test_trends_from_recorded_readings() {
        let service = service();
        for (days_ago, weight) in [(9, 80.0), (8, 80.0), (7, 80.0), (3, 90.0), (2, 90.0), (1, 90.0)] {
            service
                .record_reading(request("weight", ReadingValue::Scalar(weight), days_ago))
                .await
                .unwrap();
        }
        // Outside a 5 day window only three readings remain, which is not enough
        assert!(service.get_trends("p1", Some(5)).await.unwrap().is_empty());

        let trends = service.get_trends("p1", None).await.unwrap();
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].tag, TrendTag::Up);
        assert_eq!(trends[0].reading_count, 6);
    }

    #[tokio::test]
    async fn test_unreachable_store_is_fetch_failure() {
        let service = MetricService::new(
            MockMetricRepository::unreachable(),
            MockAlertRepository::new(),
            PortalConfig::default(),
        );
        assert!(matches!(service.get_trends("p1", None).await, Err(PortalError::FetchFailure(_))));
    }

    #[tokio::test]
    async fn test_exhausted_pool_fails_within_fetch_timeout() {
        use care_portal_data::database::{create_in_memory_pool, DatabaseConfig, DatabasePool};
        use care_portal_data::repository::{AlertRepository, MetricRepository};

        let pool = create_in_memory_pool(&DatabaseConfig { timeout_seconds: 2, ..DatabaseConfig::default() }).unwrap();
        let DatabasePool::SQLite(inner) = &pool;
        let held = inner.get().unwrap();

        let service = MetricService::new(
            MetricRepository::with_pool(pool.clone()),
            AlertRepository::with_pool(pool.clone()),
            PortalConfig { fetch_timeout: StdDuration::from_millis(50), ..PortalConfig::default() },
        );

        let started = std::time::Instant::now();
        let result = service.get_readings("p1", None).await;
        assert!(matches!(result, Err(PortalError::FetchFailure(msg)) if msg.contains("timed out")));
        assert!(started.elapsed() < StdDuration::from_secs(1));
        drop(held);
    }

    #[tokio::test]
    async fn test_slow_store_times_out() {
        let result: Result<(), PortalError> = with_timeout(StdDuration::from_millis(10), "slow fetch", async {
            tokio::time::sleep(StdDuration::from_millis(200)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(PortalError::FetchFailure(msg)) if msg.contains("timed out")));
    }
}
