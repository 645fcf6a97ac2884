//! Database initialization
//!
//! `init_database` opens (creating if needed) a writable store and ensures the
//! schema exists. Services that only read use `connect_readonly`.

use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// How long a connection waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Open or create the event store and ensure the schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        // Read-only connections cannot create WAL shared-memory files
        .journal_mode(SqliteJournalMode::Delete)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Idempotent - safe to call on every start
    create_metric_sets_table(&pool).await?;
    create_adjectives_table(&pool).await?;
    create_condensed_topics_table(&pool).await?;
    create_metric_log_condensed_table(&pool).await?;

    Ok(pool)
}

/// Connect to an existing store in read-only mode
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(Error::NotFound(format!(
            "Database not found: {}",
            db_path.display()
        )));
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .read_only(true)
        .busy_timeout(BUSY_TIMEOUT);
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    // Verify read-only by attempting a write (should fail)
    #[cfg(debug_assertions)]
    {
        let write_test = sqlx::query("CREATE TABLE _test_write (id INTEGER)")
            .execute(&pool)
            .await;
        if write_test.is_ok() {
            return Err(Error::Internal(
                "database connection is not read-only".to_string(),
            ));
        }
    }

    Ok(pool)
}

async fn create_metric_sets_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS metric_sets (
            set_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_adjectives_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS adjectives (
            adjective_id INTEGER PRIMARY KEY AUTOINCREMENT,
            adjective TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_condensed_topics_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS condensed_topics (
            condensed_topic_id INTEGER PRIMARY KEY AUTOINCREMENT,
            condensed_topic TEXT NOT NULL UNIQUE,
            category TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_metric_log_condensed_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS metric_log_condensed (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            set_id INTEGER NOT NULL REFERENCES metric_sets(set_id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            severity INTEGER NOT NULL CHECK (severity BETWEEN 1 AND 10),
            impressions INTEGER NOT NULL CHECK (impressions >= 0),
            adjective_id INTEGER NOT NULL REFERENCES adjectives(adjective_id),
            condensed_topic_id INTEGER NOT NULL REFERENCES condensed_topics(condensed_topic_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_metric_log_condensed_set_date
         ON metric_log_condensed(set_id, date)",
    )
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_schema() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("nested").join("smd.db");

        let pool = init_database(&db_path).await.unwrap();
        assert!(db_path.exists());

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(
            tables,
            vec!["adjectives", "condensed_topics", "metric_log_condensed", "metric_sets"]
        );
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("smd.db");
        let first = init_database(&db_path).await.unwrap();
        crate::db::ingest::create_metric_set(&first, "City").await.unwrap();
        first.close().await;

        let second = init_database(&db_path).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM metric_sets")
            .fetch_one(&second)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_readonly_rejects_writes() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("smd.db");
        init_database(&db_path).await.unwrap().close().await;

        let pool = connect_readonly(&db_path).await.unwrap();
        let result = sqlx::query("INSERT INTO metric_sets (name) VALUES ('x')")
            .execute(&pool)
            .await;
        assert!(result.is_err(), "Write operation should fail in read-only mode");
    }

    #[tokio::test]
    async fn test_readonly_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = connect_readonly(&dir.path().join("absent.db")).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
