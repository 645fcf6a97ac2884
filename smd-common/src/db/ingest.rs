//! Writes into the event store
//!
//! The dashboard itself only reads; these helpers load condensed rows produced
//! upstream and seed fixtures.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::time::format_date;
use crate::{Error, EventRecord, Result};

/// Create a metric set, returning its id
pub async fn create_metric_set(pool: &SqlitePool, name: &str) -> Result<i64> {
    let result = sqlx::query("INSERT INTO metric_sets (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Store one condensed row, creating adjective and topic entries on first use
pub async fn insert_event(
    pool: &SqlitePool,
    set_id: i64,
    date: NaiveDate,
    record: &EventRecord,
) -> Result<()> {
    let impressions = i64::try_from(record.impressions)
        .map_err(|_| Error::InvalidInput(format!("impressions out of range: {}", record.impressions)))?;

    sqlx::query("INSERT OR IGNORE INTO adjectives (adjective) VALUES (?)")
        .bind(&record.adjective)
        .execute(pool)
        .await?;
    let adjective_id: i64 =
        sqlx::query_scalar("SELECT adjective_id FROM adjectives WHERE adjective = ?")
            .bind(&record.adjective)
            .fetch_one(pool)
            .await?;

    sqlx::query("INSERT OR IGNORE INTO condensed_topics (condensed_topic, category) VALUES (?, ?)")
        .bind(&record.topic)
        .bind(record.category.as_deref())
        .execute(pool)
        .await?;
    let topic_id: i64 = sqlx::query_scalar(
        "SELECT condensed_topic_id FROM condensed_topics WHERE condensed_topic = ?",
    )
    .bind(&record.topic)
    .fetch_one(pool)
    .await?;

    sqlx::query(
        "INSERT INTO metric_log_condensed
             (set_id, date, severity, impressions, adjective_id, condensed_topic_id)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(set_id)
    .bind(format_date(date))
    .bind(record.severity)
    .bind(impressions)
    .bind(adjective_id)
    .bind(topic_id)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_insert_event_reuses_lookup_rows() {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("smd.db")).await.unwrap();
        let set_id = create_metric_set(&pool, "City").await.unwrap();
        let date = crate::time::parse_date("2024-01-01").unwrap();

        let record = EventRecord::new(2, 10, "joy", "Parks").with_category("Leisure");
        insert_event(&pool, set_id, date, &record).await.unwrap();
        insert_event(&pool, set_id, date, &record).await.unwrap();

        let adjectives: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM adjectives")
            .fetch_one(&pool)
            .await
            .unwrap();
        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM metric_log_condensed")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(adjectives, 1);
        assert_eq!(rows, 2);
    }
}
