//! smd-charts library - chart-data service of the Sentiment Metric Dashboard
//!
//! Serves the flow diagram and the sibling dashboard charts as JSON over a
//! read-only connection to the event store.

use axum::Router;
use smd_common::FlowOptions;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cli;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (read-only)
    pub db: SqlitePool,
    /// Flow-engine defaults; request parameters override per call
    pub flow: FlowOptions,
}

impl AppState {
    pub fn new(db: SqlitePool, flow: FlowOptions) -> Self {
        Self { db, flow }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let sets = Router::new()
        .route("/api/sets/:set_id/date-range", get(api::get_date_range))
        .route("/api/sets/:set_id/sankey", get(api::get_sankey))
        .route("/api/sets/:set_id/sentiment-over-time", get(api::get_sentiment_over_time))
        .route("/api/sets/:set_id/topic-frequency", get(api::get_topic_frequency))
        .route("/api/sets/:set_id/force-field", get(api::get_force_field))
        .route("/api/sets/:set_id/severity-topics", get(api::get_severity_topics))
        .route("/api/compare", get(api::get_comparison));

    Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .merge(sets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
