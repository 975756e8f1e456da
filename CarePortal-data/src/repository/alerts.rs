use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;
use async_trait::async_trait;

use crate::database::{get_db_pool, DatabasePool};
use crate::models::alert::{AlertRecord, NewAlertRecord};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::{run_blocking, DatabaseStorage};

/// Repository trait for patient alerts (the Alert Store)
#[async_trait]
pub trait AlertRepositoryTrait {
    /// Store a new, unread alert
    async fn create(&self, alert: NewAlertRecord) -> Result<AlertRecord, RepositoryError>;

    /// Unexpired alerts for `patient_id`, newest first, at most `limit`
    async fn get_active(
        &self,
        patient_id: &str,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<AlertRecord>, RepositoryError>;

    /// Set `is_read = true` on one alert
    async fn mark_read(&self, id: &str) -> Result<(), RepositoryError>;
}

/// Repository for patient alerts
#[derive(Debug, Clone, Default)]
pub struct AlertRepository {
    pool: Option<DatabasePool>,
    storage: InMemoryStorage,
}

impl AlertRepository {
    /// Create a repository backed by the global pool if it is initialised
    pub fn new() -> Self {
        let pool = match get_db_pool() {
            Ok(pool) => Some(pool),
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for alerts", e);
                None
            }
        };
        Self { pool, storage: InMemoryStorage::new() }
    }

    /// Create a repository backed by an explicit pool
    pub fn with_pool(pool: DatabasePool) -> Self {
        Self { pool: Some(pool), storage: InMemoryStorage::new() }
    }

    /// Create a repository over the given in-memory storage
    pub fn in_memory(storage: InMemoryStorage) -> Self {
        Self { pool: None, storage }
    }
}

#[async_trait]
impl AlertRepositoryTrait for AlertRepository {
    async fn create(&self, alert: NewAlertRecord) -> Result<AlertRecord, RepositoryError> {
        let alert = AlertRecord {
            id: Uuid::new_v4().to_string(),
            patient_id: alert.patient_id,
            severity: alert.severity,
            title: alert.title,
            message: alert.message,
            metric_type: alert.metric_type,
            is_read: false,
            created_at: Utc::now(),
            expires_at: alert.expires_at,
        };

        match &self.pool {
            Some(pool) => {
                let stored = alert.clone();
                run_blocking(pool, move |pool| DatabaseStorage::store_alert(pool, &stored)).await?;
                Ok(alert)
            }
            None => self.storage.store_alert(&alert),
        }
    }

    async fn get_active(
        &self,
        patient_id: &str,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<AlertRecord>, RepositoryError> {
        match &self.pool {
            Some(pool) => {
                let patient_id = patient_id.to_string();
                run_blocking(pool, move |pool| DatabaseStorage::active_alerts(pool, &patient_id, now, limit)).await
            }
            None => self.storage.active_alerts(patient_id, now, limit),
        }
    }

    async fn mark_read(&self, id: &str) -> Result<(), RepositoryError> {
        match &self.pool {
            Some(pool) => {
                let id = id.to_string();
                run_blocking(pool, move |pool| DatabaseStorage::mark_alert_read(pool, &id)).await
            }
            None => self.storage.mark_alert_read(id),
        }
    }
}
