//! SQLite implementation of the event feed

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::flow::record::{UNKNOWN_ADJECTIVE, UNKNOWN_TOPIC};
use crate::flow::{EventFeed, EventRecord};
use crate::{DateRange, Error, Result};

/// Reads condensed rows joined with their adjective and topic labels
#[derive(Debug, Clone)]
pub struct SqliteEventFeed {
    pool: SqlitePool,
}

impl SqliteEventFeed {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventFeed for SqliteEventFeed {
    async fn fetch_events(&self, set_id: i64, range: DateRange) -> Result<Vec<EventRecord>> {
        let (start, end) = range.bounds();
        let rows = sqlx::query_as::<_, (i64, i64, Option<String>, Option<String>, Option<String>)>(
            r#"
            SELECT mlc.severity,
                   mlc.impressions,
                   a.adjective,
                   ct.condensed_topic,
                   ct.category
            FROM metric_log_condensed AS mlc
            LEFT JOIN adjectives AS a ON mlc.adjective_id = a.adjective_id
            LEFT JOIN condensed_topics AS ct ON mlc.condensed_topic_id = ct.condensed_topic_id
            WHERE mlc.set_id = ?
              AND mlc.date >= ?
              AND mlc.date <= ?
            ORDER BY mlc.id
            "#,
        )
        .bind(set_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(severity, impressions, adjective, topic, category)| {
                let impressions = u64::try_from(impressions).map_err(|_| {
                    Error::DataSource(format!(
                        "negative impressions ({}) for set {}",
                        impressions, set_id
                    ))
                })?;
                Ok(EventRecord {
                    severity,
                    impressions,
                    adjective: adjective.unwrap_or_else(|| UNKNOWN_ADJECTIVE.to_string()),
                    topic: topic.unwrap_or_else(|| UNKNOWN_TOPIC.to_string()),
                    category,
                })
            })
            .collect()
    }
}
