//! Two-set comparison endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use smd_common::db::{self, Comparison};

use super::error::ApiError;
use super::params::{require_set, resolve_pair_range};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub set1: i64,
    pub set2: i64,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// GET /api/compare?set1&set2&start&end
pub async fn get_comparison(
    State(state): State<AppState>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<Comparison>, ApiError> {
    require_set(&state.db, query.set1).await?;
    require_set(&state.db, query.set2).await?;
    let range = resolve_pair_range(
        &state.db,
        query.set1,
        query.set2,
        query.start.as_deref(),
        query.end.as_deref(),
    )
    .await?;

    Ok(Json(db::compare(&state.db, query.set1, query.set2, range).await?))
}
