use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use tracing::debug;

use crate::database::DatabasePool;
use crate::models::alert::AlertRecord;
use crate::models::metric::MetricRecord;
use crate::models::{format_timestamp, parse_timestamp};
use super::errors::RepositoryError;

/// Raw health_metrics row before value and timestamp decoding
type MetricRow = (String, String, String, String, String, Option<String>);

/// Raw alerts row before timestamp decoding
type AlertRow = (String, String, String, String, String, Option<String>, bool, String, Option<String>);

/// Run a blocking storage call on the runtime's blocking pool.
///
/// `r2d2` and `rusqlite` block the calling thread, so callers awaiting a
/// timeout around a repository call would otherwise never get to observe it.
pub(crate) async fn run_blocking<T, F>(pool: &DatabasePool, call: F) -> Result<T, RepositoryError>
where
    F: FnOnce(&DatabasePool) -> Result<T, RepositoryError> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || call(&pool)).await?
}

/// Database storage operations for health metrics and alerts
pub struct DatabaseStorage;

impl DatabaseStorage {
    /// Store a metric record in the database
    pub fn store_metric(pool: &DatabasePool, record: &MetricRecord) -> Result<(), RepositoryError> {
        debug!("Storing health metric in database: id={}", record.id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                let value = serde_json::to_string(&record.value)?;

                conn.execute(
                    "INSERT INTO health_metrics
                     (id, patient_id, metric_type, value, recorded_at, notes)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    (
                        &record.id,
                        &record.patient_id,
                        &record.metric_type,
                        &value,
                        format_timestamp(&record.recorded_at),
                        &record.notes,
                    ),
                )?;

                Ok(())
            }
        }
    }

    /// Metric records for a patient recorded at or after `since`, oldest first
    pub fn metrics_since(
        pool: &DatabasePool,
        patient_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MetricRecord>, RepositoryError> {
        debug!("Getting health metrics for patient {} since {}", patient_id, since);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let mut stmt = conn.prepare(
                    "SELECT id, patient_id, metric_type, value, recorded_at, notes
                     FROM health_metrics
                     WHERE patient_id = ?1 AND recorded_at >= ?2
                     ORDER BY recorded_at ASC, id ASC",
                )?;

                let rows = stmt.query_map((patient_id, format_timestamp(&since)), |row| -> rusqlite::Result<MetricRow> {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                    ))
                })?;

                let mut result = Vec::new();
                for row in rows {
                    result.push(Self::decode_metric(row?)?);
                }

                Ok(result)
            }
        }
    }

    /// Store an alert in the database
    pub fn store_alert(pool: &DatabasePool, alert: &AlertRecord) -> Result<(), RepositoryError> {
        debug!("Storing alert in database: id={}", alert.id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                conn.execute(
                    "INSERT INTO alerts
                     (id, patient_id, severity, title, message, metric_type, is_read, created_at, expires_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    (
                        &alert.id,
                        &alert.patient_id,
                        &alert.severity,
                        &alert.title,
                        &alert.message,
                        &alert.metric_type,
                        alert.is_read,
                        format_timestamp(&alert.created_at),
                        alert.expires_at.as_ref().map(format_timestamp),
                    ),
                )?;

                Ok(())
            }
        }
    }

    /// Unexpired alerts for a patient, newest first
    pub fn active_alerts(
        pool: &DatabasePool,
        patient_id: &str,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<AlertRecord>, RepositoryError> {
        debug!("Getting active alerts for patient {}", patient_id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let mut stmt = conn.prepare(
                    "SELECT id, patient_id, severity, title, message, metric_type, is_read, created_at, expires_at
                     FROM alerts
                     WHERE patient_id = ?1 AND (expires_at IS NULL OR expires_at > ?2)
                     ORDER BY created_at DESC, id ASC
                     LIMIT ?3",
                )?;

                let rows = stmt.query_map(
                    (patient_id, format_timestamp(&now), limit as i64),
                    |row| -> rusqlite::Result<AlertRow> {
                        Ok((
                            row.get(0)?,
                            row.get(1)?,
                            row.get(2)?,
                            row.get(3)?,
                            row.get(4)?,
                            row.get(5)?,
                            row.get(6)?,
                            row.get(7)?,
                            row.get(8)?,
                        ))
                    },
                )?;

                let mut result = Vec::new();
                for row in rows {
                    result.push(Self::decode_alert(row?)?);
                }

                Ok(result)
            }
        }
    }

    /// Flag an alert as read
    pub fn mark_alert_read(pool: &DatabasePool, id: &str) -> Result<(), RepositoryError> {
        debug!("Marking alert {} as read", id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let exists = conn
                    .query_row("SELECT 1 FROM alerts WHERE id = ?1", [id], |row| row.get::<_, i64>(0))
                    .optional()?;
                if exists.is_none() {
                    return Err(RepositoryError::NotFound(format!("Alert {} not found", id)));
                }

                conn.execute("UPDATE alerts SET is_read = 1 WHERE id = ?1", [id])?;
                Ok(())
            }
        }
    }

    fn decode_metric(row: MetricRow) -> Result<MetricRecord, RepositoryError> {
        let (id, patient_id, metric_type, value, recorded_at, notes) = row;
        Ok(MetricRecord {
            id,
            patient_id,
            metric_type,
            value: serde_json::from_str(&value)?,
            recorded_at: parse_timestamp(&recorded_at).map_err(RepositoryError::DateParse)?,
            notes,
        })
    }

    fn decode_alert(row: AlertRow) -> Result<AlertRecord, RepositoryError> {
        let (id, patient_id, severity, title, message, metric_type, is_read, created_at, expires_at) = row;
        let expires_at = match expires_at {
            Some(value) => Some(parse_timestamp(&value).map_err(RepositoryError::DateParse)?),
            None => None,
        };

        Ok(AlertRecord {
            id,
            patient_id,
            severity,
            title,
            message,
            metric_type,
            is_read,
            created_at: parse_timestamp(&created_at).map_err(RepositoryError::DateParse)?,
            expires_at,
        })
    }
}
