//! Chart-data lookups for the dashboard
//!
//! Parameterized queries over `metric_log_condensed`. Every ranged query
//! takes inclusive `YYYY-MM-DD` bounds.

use std::cmp::Ordering;

use sqlx::SqlitePool;

use super::models::*;
use crate::flow::NEUTRAL_SEVERITY;
use crate::ratio::Ratio;
use crate::time::{fallback_earliest, parse_date, today};
use crate::{DateRange, Error, Result};

/// Topics listed on each side of a comparison
pub const COMPARISON_TOPICS: usize = 3;

/// Look up a metric set by id
pub async fn metric_set(pool: &SqlitePool, set_id: i64) -> Result<MetricSet> {
    sqlx::query_as::<_, (i64, String)>("SELECT set_id, name FROM metric_sets WHERE set_id = ?")
        .bind(set_id)
        .fetch_optional(pool)
        .await?
        .map(|(set_id, name)| MetricSet { set_id, name })
        .ok_or_else(|| Error::NotFound(format!("metric set {}", set_id)))
}

/// Earliest and latest stored dates for a set.
///
/// A set without rows spans from the fallback earliest date to today.
pub async fn date_range(pool: &SqlitePool, set_id: i64) -> Result<DateRange> {
    let (earliest, latest) = sqlx::query_as::<_, (Option<String>, Option<String>)>(
        "SELECT MIN(date), MAX(date) FROM metric_log_condensed WHERE set_id = ?",
    )
    .bind(set_id)
    .fetch_one(pool)
    .await?;

    let earliest = match earliest {
        Some(date) => parse_stored_date(&date)?,
        None => fallback_earliest(),
    };
    let latest = match latest {
        Some(date) => parse_stored_date(&date)?,
        None => today(),
    };
    DateRange::new(earliest, latest.max(earliest))
}

fn parse_stored_date(value: &str) -> Result<chrono::NaiveDate> {
    parse_date(value).map_err(|_| Error::DataSource(format!("malformed stored date '{}'", value)))
}

/// Daily impressions per sentiment bucket over the whole history of a set
pub async fn sentiment_over_time(pool: &SqlitePool, set_id: i64) -> Result<Vec<DailySentiment>> {
    let rows = sqlx::query_as::<_, (String, i64, i64, i64)>(
        r#"
        SELECT date,
               COALESCE(SUM(CASE WHEN severity < ? THEN impressions END), 0) AS positive,
               COALESCE(SUM(CASE WHEN severity = ? THEN impressions END), 0) AS neutral,
               COALESCE(SUM(CASE WHEN severity > ? THEN impressions END), 0) AS negative
        FROM metric_log_condensed
        WHERE set_id = ?
        GROUP BY date
        ORDER BY date ASC
        "#,
    )
    .bind(NEUTRAL_SEVERITY)
    .bind(NEUTRAL_SEVERITY)
    .bind(NEUTRAL_SEVERITY)
    .bind(set_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(date, positive, neutral, negative)| DailySentiment {
            date,
            positive,
            neutral,
            negative,
        })
        .collect())
}

/// Per-topic volume with share of the set's total impressions in range
pub async fn topic_frequencies(
    pool: &SqlitePool,
    set_id: i64,
    range: DateRange,
) -> Result<Vec<TopicFrequency>> {
    let (start, end) = range.bounds();

    let total: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(impressions), 0) FROM metric_log_condensed
         WHERE set_id = ? AND date >= ? AND date <= ?",
    )
    .bind(set_id)
    .bind(&start)
    .bind(&end)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query_as::<_, (String, f64, i64)>(
        r#"
        SELECT ct.condensed_topic,
               AVG(mlc.severity),
               COALESCE(SUM(mlc.impressions), 0) AS total_impressions
        FROM metric_log_condensed AS mlc
        JOIN condensed_topics AS ct ON mlc.condensed_topic_id = ct.condensed_topic_id
        WHERE mlc.set_id = ?
          AND mlc.date >= ?
          AND mlc.date <= ?
        GROUP BY ct.condensed_topic
        ORDER BY total_impressions DESC, ct.condensed_topic ASC
        "#,
    )
    .bind(set_id)
    .bind(&start)
    .bind(&end)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(topic, avg_severity, total_impressions)| TopicFrequency {
            topic,
            avg_severity,
            total_impressions,
            percentage_of_total: Ratio::percentage(non_negative(total_impressions), non_negative(total)),
        })
        .collect())
}

/// Topics grouped by the side of the neutral midpoint their average severity falls on.
///
/// Topics averaging exactly the midpoint are dropped unless `include_neutral`
/// is set, in which case they are listed under `neutral`.
pub async fn force_field(
    pool: &SqlitePool,
    set_id: i64,
    range: DateRange,
    include_neutral: bool,
) -> Result<ForceField> {
    let (start, end) = range.bounds();
    let rows = sqlx::query_as::<_, (String, i64, i64)>(
        r#"
        SELECT ct.condensed_topic,
               SUM(mlc.severity),
               COUNT(*)
        FROM metric_log_condensed AS mlc
        JOIN condensed_topics AS ct ON mlc.condensed_topic_id = ct.condensed_topic_id
        WHERE mlc.set_id = ?
          AND mlc.date >= ?
          AND mlc.date <= ?
        GROUP BY ct.condensed_topic
        "#,
    )
    .bind(set_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let mut field = ForceField::default();
    for (topic, severity_sum, count) in rows {
        // Integer comparison keeps the midpoint test exact
        let midpoint = NEUTRAL_SEVERITY * count;
        let entry = ForceFieldTopic {
            topic,
            avg_severity: severity_sum as f64 / count as f64,
        };
        match severity_sum.cmp(&midpoint) {
            Ordering::Less => field.positive.push(entry),
            Ordering::Greater => field.negative.push(entry),
            Ordering::Equal if include_neutral => field.neutral.push(entry),
            Ordering::Equal => {}
        }
    }

    field.positive.sort_by(|a, b| {
        a.avg_severity
            .total_cmp(&b.avg_severity)
            .then_with(|| a.topic.cmp(&b.topic))
    });
    field.negative.sort_by(|a, b| {
        b.avg_severity
            .total_cmp(&a.avg_severity)
            .then_with(|| a.topic.cmp(&b.topic))
    });
    field.neutral.sort_by(|a, b| a.topic.cmp(&b.topic));
    Ok(field)
}

/// Topics by maximum severity, highest first. `None` returns every topic.
pub async fn severity_topics(
    pool: &SqlitePool,
    set_id: i64,
    range: DateRange,
    limit: Option<u32>,
) -> Result<Vec<TopicSeverity>> {
    let (start, end) = range.bounds();
    // SQLite treats a negative LIMIT as unbounded
    let limit = limit.map(i64::from).unwrap_or(-1);

    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT ct.condensed_topic,
               MAX(mlc.severity) AS max_severity
        FROM metric_log_condensed AS mlc
        JOIN condensed_topics AS ct ON mlc.condensed_topic_id = ct.condensed_topic_id
        WHERE mlc.set_id = ?
          AND mlc.date >= ?
          AND mlc.date <= ?
        GROUP BY ct.condensed_topic
        ORDER BY max_severity DESC, ct.condensed_topic ASC
        LIMIT ?
        "#,
    )
    .bind(set_id)
    .bind(start)
    .bind(end)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(topic, max_severity)| TopicSeverity { topic, max_severity })
        .collect())
}

/// Side-by-side summary of two sets over the same range
pub async fn compare(
    pool: &SqlitePool,
    set1: i64,
    set2: i64,
    range: DateRange,
) -> Result<Comparison> {
    Ok(Comparison {
        set1: set_summary(pool, set1, range).await?,
        set2: set_summary(pool, set2, range).await?,
    })
}

/// Weighted severity figures for one set
pub async fn set_summary(pool: &SqlitePool, set_id: i64, range: DateRange) -> Result<SetSummary> {
    let (start, end) = range.bounds();

    let (weighted, weight) = sqlx::query_as::<_, (i64, i64)>(
        "SELECT COALESCE(SUM(severity * impressions), 0), COALESCE(SUM(impressions), 0)
         FROM metric_log_condensed
         WHERE set_id = ? AND date >= ? AND date <= ?",
    )
    .bind(set_id)
    .bind(&start)
    .bind(&end)
    .fetch_one(pool)
    .await?;

    let topic_rows = sqlx::query_as::<_, (String, i64, i64)>(
        r#"
        SELECT ct.condensed_topic,
               COALESCE(SUM(mlc.severity * mlc.impressions), 0),
               COALESCE(SUM(mlc.impressions), 0)
        FROM metric_log_condensed AS mlc
        JOIN condensed_topics AS ct ON mlc.condensed_topic_id = ct.condensed_topic_id
        WHERE mlc.set_id = ?
          AND mlc.date >= ?
          AND mlc.date <= ?
        GROUP BY ct.condensed_topic
        ORDER BY ct.condensed_topic ASC
        "#,
    )
    .bind(set_id)
    .bind(&start)
    .bind(&end)
    .fetch_all(pool)
    .await?;

    let daily_rows = sqlx::query_as::<_, (String, i64, i64)>(
        r#"
        SELECT date,
               COALESCE(SUM(severity * impressions), 0),
               COALESCE(SUM(impressions), 0)
        FROM metric_log_condensed
        WHERE set_id = ? AND date >= ? AND date <= ?
        GROUP BY date
        ORDER BY date ASC
        "#,
    )
    .bind(set_id)
    .bind(&start)
    .bind(&end)
    .fetch_all(pool)
    .await?;

    let averages: Vec<TopicAverage> = topic_rows
        .into_iter()
        .map(|(topic, weighted, weight)| TopicAverage {
            topic,
            avg_severity: Ratio::weighted_mean(non_negative(weighted), non_negative(weight)),
        })
        .collect();

    Ok(SetSummary {
        set_id,
        net_severity: Ratio::weighted_mean(non_negative(weighted), non_negative(weight)),
        most_positive: rank_topics(&averages, Ordering::Less),
        most_negative: rank_topics(&averages, Ordering::Greater),
        time_series: daily_rows
            .into_iter()
            .map(|(date, weighted, weight)| DailyAverage {
                date,
                avg_severity: Ratio::weighted_mean(non_negative(weighted), non_negative(weight)),
            })
            .collect(),
    })
}

/// Top topics by defined average; `Less` ranks lowest severity first.
/// Input is topic-sorted, so the stable sort breaks ties alphabetically.
fn rank_topics(averages: &[TopicAverage], direction: Ordering) -> Vec<TopicAverage> {
    let mut ranked: Vec<(f64, &TopicAverage)> = averages
        .iter()
        .filter_map(|t| t.avg_severity.value().map(|v| (v, t)))
        .collect();
    ranked.sort_by(|a, b| {
        let ord = a.0.total_cmp(&b.0);
        if direction == Ordering::Greater {
            ord.reverse()
        } else {
            ord
        }
    });
    ranked
        .into_iter()
        .take(COMPARISON_TOPICS)
        .map(|(_, t)| t.clone())
        .collect()
}

fn non_negative(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
