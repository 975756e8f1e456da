use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use tracing::{info, warn};

use care_portal_data::repository::AlertRepositoryTrait;

use crate::config::PortalConfig;
use crate::entities::alert::{Alert, MarkAllReadOutcome};
use crate::entities::conversions;
use crate::errors::PortalError;
use crate::services::metrics::with_timeout;

/// Trait for alert feed operations
#[async_trait]
pub trait AlertServiceTrait {
    /// Unexpired alerts, newest first, up to the configured limit
    async fn get_active_alerts(&self, patient_id: &str) -> Result<Vec<Alert>, PortalError>;

    /// Mark one alert as read
    async fn mark_read(&self, alert_id: &str) -> Result<(), PortalError>;

    /// Mark every unread active alert as read, reporting per-alert failures
    async fn mark_all_read(&self, patient_id: &str) -> Result<MarkAllReadOutcome, PortalError>;
}

/// Alert feed over the alert store
pub struct AlertService<A: AlertRepositoryTrait> {
    repository: A,
    config: PortalConfig,
}

impl<A: AlertRepositoryTrait> AlertService<A> {
    pub fn new(repository: A, config: PortalConfig) -> Self {
        Self { repository, config }
    }
}

#[async_trait]
impl<A: AlertRepositoryTrait + Send + Sync> AlertServiceTrait for AlertService<A> {
    async fn get_active_alerts(&self, patient_id: &str) -> Result<Vec<Alert>, PortalError> {
        let records = with_timeout(
            self.config.fetch_timeout,
            "fetch alerts",
            self.repository.get_active(patient_id, Utc::now(), self.config.alert_limit),
        )
        .await?;
        Ok(conversions::convert_to_domain_alerts(records))
    }

    async fn mark_read(&self, alert_id: &str) -> Result<(), PortalError> {
        with_timeout(self.config.fetch_timeout, "mark alert read", self.repository.mark_read(alert_id)).await?;
        info!("Marked alert {} as read", alert_id);
        Ok(())
    }

    async fn mark_all_read(&self, patient_id: &str) -> Result<MarkAllReadOutcome, PortalError> {
        let unread: Vec<String> = self
            .get_active_alerts(patient_id)
            .await?
            .into_iter()
            .filter(|alert| !alert.is_read)
            .map(|alert| alert.id)
            .collect();

        let results = join_all(unread.iter().map(|id| async move {
            let result = with_timeout(self.config.fetch_timeout, "mark alert read", self.repository.mark_read(id)).await;
            (id.clone(), result)
        }))
        .await;

        let mut outcome = MarkAllReadOutcome::default();
        for (id, result) in results {
            match result {
                Ok(()) => outcome.updated.push(id),
                Err(e) => {
                    warn!("Failed to mark alert {} as read: {}", id, e);
                    outcome.failed.push(id);
                }
            }
        }

        info!(
            "Marked {} alerts read for patient {} ({} failed)",
            outcome.updated.len(),
            patient_id,
            outcome.failed.len()
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use care_portal_data::models::alert::AlertRecord;
    use care_portal_data::repository::mock::MockAlertRepository;
    use crate::entities::alert::AlertSeverity;

    fn record(id: &str, severity: &str, is_read: bool, created_at: DateTime<Utc>) -> AlertRecord {
        AlertRecord {
            id: id.to_string(),
            patient_id: "p1".to_string(),
            severity: severity.to_string(),
            title: "Alert".to_string(),
            message: "Reading outside normal range".to_string(),
            metric_type: None,
            is_read,
            created_at,
            expires_at: Some(created_at + Duration::days(7)),
        }
    }

    fn seeded() -> MockAlertRepository {
        let now = Utc::now();
        MockAlertRepository::new().with_alerts(vec![
            record("a1", "low", false, now - Duration::hours(3)),
            record("a2", "critical", false, now - Duration::hours(2)),
            record("a3", "medium", true, now - Duration::hours(1)),
            record("expired", "high", false, now - Duration::days(10)),
        ])
    }

    #[tokio::test]
    async fn test_active_alerts_newest_first() {
        let service = AlertService::new(seeded(), PortalConfig::default());
        let alerts = service.get_active_alerts("p1").await.unwrap();
        let ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a3", "a2", "a1"]);
        assert_eq!(alerts[1].severity, AlertSeverity::Critical);
    }

    #[tokio::test]
    async fn test_alert_limit() {
        let config = PortalConfig { alert_limit: 2, ..PortalConfig::default() };
        let service = AlertService::new(seeded(), config);
        assert_eq!(service.get_active_alerts("p1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_mark_read_unknown_alert() {
        let service = AlertService::new(seeded(), PortalConfig::default());
        assert!(matches!(service.mark_read("nope").await, Err(PortalError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mark_all_read() {
        let service = AlertService::new(seeded(), PortalConfig::default());
        let outcome = service.mark_all_read("p1").await.unwrap();
        assert!(outcome.is_complete());
        let mut updated = outcome.updated.clone();
        updated.sort();
        assert_eq!(updated, vec!["a1".to_string(), "a2".to_string()]);

        let alerts = service.get_active_alerts("p1").await.unwrap();
        assert!(alerts.iter().all(|a| a.is_read));
    }

    #[tokio::test]
    async fn test_mark_all_read_partial_failure() {
        let service = AlertService::new(seeded().with_failing_ids(&["a2"]), PortalConfig::default());
        let outcome = service.mark_all_read("p1").await.unwrap();
        assert_eq!(outcome.updated, vec!["a1".to_string()]);
        assert_eq!(outcome.failed, vec!["a2".to_string()]);
        assert!(!outcome.is_complete());

        let alerts = service.get_active_alerts("p1").await.unwrap();
        let critical = alerts.iter().find(|a| a.id == "a2").unwrap();
        assert!(!critical.is_read);
    }

    #[tokio::test]
    async fn test_unreachable_alert_store() {
        let service = AlertService::new(MockAlertRepository::unreachable(), PortalConfig::default());
        assert!(matches!(service.get_active_alerts("p1").await, Err(PortalError::FetchFailure(_))));
        assert!(matches!(service.mark_all_read("p1").await, Err(PortalError::FetchFailure(_))));
    }
}
