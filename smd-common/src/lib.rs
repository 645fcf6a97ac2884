//! # SMD Common Library
//!
//! Shared code for the Sentiment Metric Dashboard services:
//! - Flow-diagram engine (aggregation tree, topic pruning, graph assembly, coloring)
//! - Event store contract and its SQLite implementation
//! - Chart-data queries for the sibling dashboard charts
//! - Configuration loading
//! - Guarded ratio helpers

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod flow;
pub mod ratio;
pub mod time;

pub use error::{Error, Result};
pub use flow::{build_flow_graph, EventRecord, FlowDepth, FlowGraph, FlowOptions, SentimentBucket};
pub use ratio::Ratio;
pub use time::DateRange;
