use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use chrono::{DateTime, Utc};

use crate::models::alert::AlertRecord;
use crate::models::metric::MetricRecord;
use super::errors::RepositoryError;

/// In-memory storage for health metrics and alerts.
///
/// Cloning shares the underlying maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    /// Health metric records keyed by id
    metrics: Arc<Mutex<HashMap<String, MetricRecord>>>,

    /// Alerts keyed by id
    alerts: Arc<Mutex<HashMap<String, AlertRecord>>>,
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a metric record in memory
    pub fn store_metric(&self, record: &MetricRecord) -> Result<MetricRecord, RepositoryError> {
        let mut store = self.metrics.lock()?;
        store.insert(record.id.clone(), record.clone());
        Ok(record.clone())
    }

    /// Metric records for a patient recorded at or after `since`, oldest first
    pub fn metrics_since(
        &self,
        patient_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MetricRecord>, RepositoryError> {
        let store = self.metrics.lock()?;
        let mut records: Vec<MetricRecord> = store
            .values()
            .filter(|record| record.patient_id == patient_id && record.recorded_at >= since)
            .cloned()
            .collect();

        records.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }

    /// Store an alert in memory
    pub fn store_alert(&self, alert: &AlertRecord) -> Result<AlertRecord, RepositoryError> {
        let mut store = self.alerts.lock()?;
        store.insert(alert.id.clone(), alert.clone());
        Ok(alert.clone())
    }

    /// Unexpired alerts for a patient, newest first
    pub fn active_alerts(
        &self,
        patient_id: &str,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<AlertRecord>, RepositoryError> {
        let store = self.alerts.lock()?;
        let mut alerts: Vec<AlertRecord> = store
            .values()
            .filter(|alert| alert.patient_id == patient_id && alert.is_active(now))
            .cloned()
            .collect();

        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        alerts.truncate(limit);
        Ok(alerts)
    }

    /// Flag an alert as read
    pub fn mark_alert_read(&self, id: &str) -> Result<(), RepositoryError> {
        let mut store = self.alerts.lock()?;
        match store.get_mut(id) {
            Some(alert) => {
                alert.is_read = true;
                Ok(())
            }
            None => Err(RepositoryError::NotFound(format!("Alert {} not found", id))),
        }
    }
}
