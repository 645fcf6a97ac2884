//! Flow diagram endpoint

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use smd_common::db::SqliteEventFeed;
use smd_common::flow::{load_flow_graph, SankeyPayload};
use smd_common::{FlowDepth, FlowOptions};
use tracing::debug;

use super::error::ApiError;
use super::params::{require_set, resolve_range};
use crate::AppState;

/// Query parameters for the flow diagram; unset values use the service defaults
#[derive(Debug, Default, Deserialize)]
pub struct SankeyQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub depth: Option<FlowDepth>,
    /// Topic limit (K)
    pub limit: Option<usize>,
    pub include_neutral: Option<bool>,
}

impl SankeyQuery {
    /// Overlay the request's options on the service defaults
    pub fn options(&self, defaults: &FlowOptions) -> FlowOptions {
        let mut options = defaults.clone();
        if let Some(depth) = self.depth {
            options.depth = depth;
        }
        if let Some(limit) = self.limit {
            options.topic_limit = limit;
        }
        if let Some(include_neutral) = self.include_neutral {
            options.include_neutral = include_neutral;
        }
        options
    }
}

/// GET /api/sets/:set_id/sankey
pub async fn get_sankey(
    State(state): State<AppState>,
    Path(set_id): Path<i64>,
    Query(query): Query<SankeyQuery>,
) -> Result<Json<SankeyPayload>, ApiError> {
    require_set(&state.db, set_id).await?;
    let range = resolve_range(&state.db, set_id, query.start.as_deref(), query.end.as_deref()).await?;
    let options = query.options(&state.flow);

    let feed = SqliteEventFeed::new(state.db.clone());
    let graph = load_flow_graph(&feed, set_id, range, &options).await?;
    debug!(set_id, nodes = graph.nodes.len(), edges = graph.edges.len(), "Flow graph built");

    Ok(Json(SankeyPayload::from(graph)))
}
