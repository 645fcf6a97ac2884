//! Shared query parameter handling

use smd_common::db::charts;
use smd_common::time::{parse_date, today};
use smd_common::{DateRange, Result};
use sqlx::SqlitePool;

/// Fail with `NotFound` for an unknown set
pub async fn require_set(pool: &SqlitePool, set_id: i64) -> Result<()> {
    charts::metric_set(pool, set_id).await.map(|_| ())
}

/// Resolve optional `start`/`end` parameters for one set.
///
/// A missing start is the set's earliest stored date; a missing end is today.
pub async fn resolve_range(
    pool: &SqlitePool,
    set_id: i64,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<DateRange> {
    let start = match start {
        Some(value) => parse_date(value)?,
        None => charts::date_range(pool, set_id).await?.start,
    };
    let end = match end {
        Some(value) => parse_date(value)?,
        None => today(),
    };
    DateRange::new(start, end)
}

/// Resolve a range spanning two sets; a missing start is the earlier of their first dates
pub async fn resolve_pair_range(
    pool: &SqlitePool,
    set1: i64,
    set2: i64,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<DateRange> {
    let start = match start {
        Some(value) => parse_date(value)?,
        None => {
            let first = charts::date_range(pool, set1).await?.start;
            let second = charts::date_range(pool, set2).await?.start;
            first.min(second)
        }
    };
    let end = match end {
        Some(value) => parse_date(value)?,
        None => today(),
    };
    DateRange::new(start, end)
}
