//! Sibling dashboard chart endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use smd_common::db::{self, DailySentiment, ForceField, TopicFrequency, TopicSeverity};
use smd_common::time::format_date;

use super::error::ApiError;
use super::params::{require_set, resolve_range};
use crate::AppState;

/// Optional inclusive date bounds
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForceFieldQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(default)]
    pub include_neutral: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct SeverityQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    /// Maximum rows; all topics when absent
    pub limit: Option<u32>,
}

/// Date-range response
#[derive(Debug, Serialize)]
pub struct DateRangeResponse {
    pub earliest: String,
    pub latest: String,
}

/// GET /api/sets/:set_id/date-range
pub async fn get_date_range(
    State(state): State<AppState>,
    Path(set_id): Path<i64>,
) -> Result<Json<DateRangeResponse>, ApiError> {
    require_set(&state.db, set_id).await?;
    let range = db::date_range(&state.db, set_id).await?;
    Ok(Json(DateRangeResponse {
        earliest: format_date(range.start),
        latest: format_date(range.end),
    }))
}

/// GET /api/sets/:set_id/sentiment-over-time
pub async fn get_sentiment_over_time(
    State(state): State<AppState>,
    Path(set_id): Path<i64>,
) -> Result<Json<Vec<DailySentiment>>, ApiError> {
    require_set(&state.db, set_id).await?;
    Ok(Json(db::sentiment_over_time(&state.db, set_id).await?))
}

/// GET /api/sets/:set_id/topic-frequency
pub async fn get_topic_frequency(
    State(state): State<AppState>,
    Path(set_id): Path<i64>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<TopicFrequency>>, ApiError> {
    require_set(&state.db, set_id).await?;
    let range = resolve_range(&state.db, set_id, query.start.as_deref(), query.end.as_deref()).await?;
    Ok(Json(db::topic_frequencies(&state.db, set_id, range).await?))
}

/// GET /api/sets/:set_id/force-field
pub async fn get_force_field(
    State(state): State<AppState>,
    Path(set_id): Path<i64>,
    Query(query): Query<ForceFieldQuery>,
) -> Result<Json<ForceField>, ApiError> {
    require_set(&state.db, set_id).await?;
    let range = resolve_range(&state.db, set_id, query.start.as_deref(), query.end.as_deref()).await?;
    Ok(Json(db::force_field(&state.db, set_id, range, query.include_neutral).await?))
}

/// GET /api/sets/:set_id/severity-topics
pub async fn get_severity_topics(
    State(state): State<AppState>,
    Path(set_id): Path<i64>,
    Query(query): Query<SeverityQuery>,
) -> Result<Json<Vec<TopicSeverity>>, ApiError> {
    require_set(&state.db, set_id).await?;
    let range = resolve_range(&state.db, set_id, query.start.as_deref(), query.end.as_deref()).await?;
    Ok(Json(db::severity_topics(&state.db, set_id, range, query.limit).await?))
}
