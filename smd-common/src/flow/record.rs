//! Condensed event rows as delivered by the event store

use serde::{Deserialize, Serialize};

use super::SentimentBucket;

/// Label used when the store has no adjective for a row
pub const UNKNOWN_ADJECTIVE: &str = "Unknown Adjective";
/// Label used when the store has no topic for a row
pub const UNKNOWN_TOPIC: &str = "Unknown Topic";
/// Label used for rows without a category in category-depth graphs
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One condensed sentiment row (already aggregated per day/topic/adjective)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Severity score, nominally 1..=10
    pub severity: i64,
    /// Impression weight of the row
    pub impressions: u64,
    /// Emotion label
    pub adjective: String,
    /// Condensed topic label
    pub topic: String,
    /// Optional topic category
    pub category: Option<String>,
}

impl EventRecord {
    pub fn new(
        severity: i64,
        impressions: u64,
        adjective: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            impressions,
            adjective: adjective.into(),
            topic: topic.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sort key covering every field, so equal keys mean equal rows
    pub fn canonical_key(&self) -> (&str, &str, Option<&str>, i64, u64) {
        (
            self.topic.as_str(),
            self.adjective.as_str(),
            self.category.as_deref(),
            self.severity,
            self.impressions,
        )
    }

    pub fn bucket(&self) -> SentimentBucket {
        SentimentBucket::classify(self.severity)
    }

    /// Category label, substituting the placeholder when absent
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }
}

/// Rows ordered by topic, adjective, category, severity, then impressions.
///
/// Aggregating in this order makes first-seen order a function of the row
/// multiset rather than of delivery order.
pub fn canonical_order(records: &[EventRecord]) -> Vec<&EventRecord> {
    let mut ordered: Vec<&EventRecord> = records.iter().collect();
    ordered.sort_by(|a, b| a.canonical_key().cmp(&b.canonical_key()));
    ordered
}
