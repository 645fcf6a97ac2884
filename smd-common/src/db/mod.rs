//! Event store access (SQLite)
//!
//! Schema creation, the [`SqliteEventFeed`] implementation of the flow
//! engine's read contract, and the chart-data lookups of the dashboard.

pub mod charts;
pub mod events;
pub mod ingest;
pub mod init;
pub mod models;

pub use charts::*;
pub use events::SqliteEventFeed;
pub use ingest::{create_metric_set, insert_event};
pub use init::{connect_readonly, init_database};
pub use models::*;
