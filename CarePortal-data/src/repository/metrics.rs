use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;
use async_trait::async_trait;

use crate::database::{get_db_pool, DatabasePool};
use crate::models::metric::{MetricRecord, NewMetricRecord};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::{run_blocking, DatabaseStorage};

/// Repository trait for health metric records (the Metric Store)
#[async_trait]
pub trait MetricRepositoryTrait {
    /// Store a new metric record
    async fn create(&self, record: NewMetricRecord) -> Result<MetricRecord, RepositoryError>;

    /// Records for `patient_id` with `recorded_at >= since`, ascending by `recorded_at`
    async fn get_since(
        &self,
        patient_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MetricRecord>, RepositoryError>;
}

/// Repository for health metric records.
///
/// Uses the SQLite pool when one is configured, otherwise in-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MetricRepository {
    pool: Option<DatabasePool>,
    storage: InMemoryStorage,
}

impl MetricRepository {
    /// Create a repository backed by the global pool if it is initialised
    pub fn new() -> Self {
        let pool = match get_db_pool() {
            Ok(pool) => Some(pool),
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for metrics", e);
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
impl MetricRepositoryTrait for MetricRepository {
    async fn create(&self, record: NewMetricRecord) -> Result<MetricRecord, RepositoryError> {
        let record = MetricRecord {
            id: Uuid::new_v4().to_string(),
            patient_id: record.patient_id,
            metric_type: record.metric_type,
            value: record.value,
            recorded_at: record.recorded_at,
            notes: record.notes,
        };

        match &self.pool {
            Some(pool) => {
                let stored = record.clone();
                run_blocking(pool, move |pool| DatabaseStorage::store_metric(pool, &stored)).await?;
                Ok(record)
            }
            None => self.storage.store_metric(&record),
        }
    }

    async fn get_since(
        &self,
        patient_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MetricRecord>, RepositoryError> {
        match &self.pool {
            Some(pool) => {
                let patient_id = patient_id.to_string();
                run_blocking(pool, move |pool| DatabaseStorage::metrics_since(pool, &patient_id, since)).await
            }
            None => self.storage.metrics_since(patient_id, since),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_in_memory_pool, DatabaseConfig};
    use chrono::Duration;

    fn new_record(patient_id: &str, metric_type: &str, value: serde_json::Value, recorded_at: DateTime<Utc>) -> NewMetricRecord {
        NewMetricRecord {
            patient_id: patient_id.to_string(),
            metric_type: metric_type.to_string(),
            value,
            recorded_at,
            notes: None,
        }
    }

    async fn exercise(repository: MetricRepository) {
        let now = Utc::now();
        repository
            .create(new_record("p1", "blood_pressure", serde_json::json!({"systolic": 128, "diastolic": 84}), now - Duration::days(1)))
            .await
            .unwrap();
        repository
            .create(new_record("p1", "heart_rate", serde_json::json!(71.5), now - Duration::days(3)))
            .await
            .unwrap();
        repository
            .create(new_record("p1", "weight", serde_json::json!(80), now - Duration::days(45)))
            .await
            .unwrap();
        repository
            .create(new_record("p2", "weight", serde_json::json!(60), now))
            .await
            .unwrap();

        let records = repository.get_since("p1", now - Duration::days(30)).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].metric_type, "heart_rate");
        assert_eq!(records[0].value, serde_json::json!(71.5));
        assert_eq!(records[1].value["systolic"], 128);
    }

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        exercise(MetricRepository::in_memory(InMemoryStorage::new())).await;
    }

    #[tokio::test]
    async fn test_sqlite_round_trip() {
        let pool = create_in_memory_pool(&DatabaseConfig::default()).unwrap();
        exercise(MetricRepository::with_pool(pool)).await;
    }
}
