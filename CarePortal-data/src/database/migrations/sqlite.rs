use rusqlite::Connection;
use tracing::info;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    info!("Running SQLite migrations");

    create_health_metrics_table(conn)?;
    create_alerts_table(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the health metrics table.
///
/// `value` holds JSON: a number for scalar metrics, an object with
/// `systolic` and `diastolic` for blood pressure.
fn create_health_metrics_table(conn: &Connection) -> Result<(), String> {
    info!("Creating health_metrics table if not exists");

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS health_metrics (
            id TEXT PRIMARY KEY,
            patient_id TEXT NOT NULL,
            metric_type TEXT NOT NULL,
            value TEXT NOT NULL,
            recorded_at TEXT NOT NULL,
            notes TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_health_metrics_patient_recorded
        ON health_metrics (patient_id, recorded_at);",
    )
    .map_err(|e| format!("Failed to create health_metrics table: {}", e))
}

/// Create the alerts table
fn create_alerts_table(conn: &Connection) -> Result<(), String> {
    info!("Creating alerts table if not exists");

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS alerts (
            id TEXT PRIMARY KEY,
            patient_id TEXT NOT NULL,
            severity TEXT NOT NULL,
            title TEXT NOT NULL,
            message TEXT NOT NULL,
            metric_type TEXT,
            is_read INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            expires_at TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_alerts_patient_created
        ON alerts (patient_id, created_at DESC);",
    )
    .map_err(|e| format!("Failed to create alerts table: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('health_metrics', 'alerts')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }
}
