//! Mock repositories with failure injection, for tests in dependent crates.

use std::collections::HashSet;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::database::DatabaseError;
use crate::models::alert::{AlertRecord, NewAlertRecord};
use crate::models::metric::{MetricRecord, NewMetricRecord};
use super::alerts::AlertRepositoryTrait;
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::metrics::MetricRepositoryTrait;

fn unreachable_store() -> RepositoryError {
    RepositoryError::Database(DatabaseError::GenericError(
        "mock store is configured to be unreachable".to_string(),
    ))
}

/// Mock metric repository that can be told to fail every call
#[derive(Debug, Default)]
pub struct MockMetricRepository {
    storage: InMemoryStorage,
    fail: bool,
}

impl MockMetricRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call returns a database error
    pub fn unreachable() -> Self {
        Self { fail: true, ..Self::default() }
    }
}

#[async_trait]
impl MetricRepositoryTrait for MockMetricRepository {
    async fn create(&self, record: NewMetricRecord) -> Result<MetricRecord, RepositoryError> {
        if self.fail {
            return Err(unreachable_store());
        }
        let record = MetricRecord {
            id: format!("mock-{}", uuid::Uuid::new_v4()),
            patient_id: record.patient_id,
            metric_type: record.metric_type,
            value: record.value,
            recorded_at: record.recorded_at,
            notes: record.notes,
        };
        self.storage.store_metric(&record)
    }

    async fn get_since(
        &self,
        patient_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MetricRecord>, RepositoryError> {
        if self.fail {
            return Err(unreachable_store());
        }
        self.storage.metrics_since(patient_id, since)
    }
}

/// Mock alert repository that can fail reads or individual `mark_read` calls
#[derive(Debug, Default)]
pub struct MockAlertRepository {
    storage: InMemoryStorage,
    fail_reads: bool,
    corrupt_writes: bool,
    failing_ids: HashSet<String>,
}

impl MockAlertRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// `get_active` and `create` return a database error
    pub fn unreachable() -> Self {
        Self { fail_reads: true, ..Self::default() }
    }

    /// `create` stores a record whose severity no service can parse
    pub fn corrupting() -> Self {
        Self { corrupt_writes: true, ..Self::default() }
    }

    /// Preload alerts, keeping their ids and timestamps
    pub fn with_alerts(self, alerts: Vec<AlertRecord>) -> Self {
        for alert in &alerts {
            let _ = self.storage.store_alert(alert);
        }
        self
    }

    /// `mark_read` fails for these ids
    pub fn with_failing_ids(mut self, ids: &[&str]) -> Self {
        self.failing_ids.extend(ids.iter().map(|id| id.to_string()));
        self
    }
}

#[async_trait]
impl AlertRepositoryTrait for MockAlertRepository {
    async fn create(&self, alert: NewAlertRecord) -> Result<AlertRecord, RepositoryError> {
        if self.fail_reads {
            return Err(unreachable_store());
        }
        let alert = AlertRecord {
            id: format!("mock-{}", uuid::Uuid::new_v4()),
            patient_id: alert.patient_id,
            severity: if self.corrupt_writes { "catastrophic".to_string() } else { alert.severity },
            title: alert.title,
            message: alert.message,
            metric_type: alert.metric_type,
            is_read: false,
            created_at: Utc::now(),
            expires_at: alert.expires_at,
        };
        self.storage.store_alert(&alert)
    }

    async fn get_active(
        &self,
        patient_id: &str,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<AlertRecord>, RepositoryError> {
        if self.fail_reads {
            return Err(unreachable_store());
        }
        self.storage.active_alerts(patient_id, now, limit)
    }

    async fn mark_read(&self, id: &str) -> Result<(), RepositoryError> {
        if self.failing_ids.contains(id) {
            return Err(unreachable_store());
        }
        self.storage.mark_alert_read(id)
    }
}
