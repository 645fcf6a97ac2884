//! Event store read contract

use async_trait::async_trait;
use chrono::NaiveDate;

use super::EventRecord;
use crate::{DateRange, Result};

/// Source of condensed event rows for one tracked entity.
///
/// Bounds are inclusive. Implementations return errors unmodified; the flow
/// engine never produces a partial graph from a failed fetch.
#[async_trait]
pub trait EventFeed: Send + Sync {
    async fn fetch_events(&self, set_id: i64, range: DateRange) -> Result<Vec<EventRecord>>;
}

/// In-memory feed, keyed by set and day
#[derive(Debug, Clone, Default)]
pub struct MemoryFeed {
    rows: Vec<(i64, NaiveDate, EventRecord)>,
}

impl MemoryFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, set_id: i64, date: NaiveDate, record: EventRecord) {
        self.rows.push((set_id, date, record));
    }

    pub fn with(mut self, set_id: i64, date: NaiveDate, record: EventRecord) -> Self {
        self.push(set_id, date, record);
        self
    }
}

#[async_trait]
impl EventFeed for MemoryFeed {
    async fn fetch_events(&self, set_id: i64, range: DateRange) -> Result<Vec<EventRecord>> {
        Ok(self
            .rows
            .iter()
            .filter(|(id, date, _)| *id == set_id && range.contains(*date))
            .map(|(_, _, record)| record.clone())
            .collect())
    }
}
