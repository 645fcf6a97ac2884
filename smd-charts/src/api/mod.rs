//! HTTP API handlers for smd-charts

pub mod buildinfo;
pub mod charts;
pub mod compare;
pub mod error;
pub mod health;
pub mod params;
pub mod sankey;

pub use buildinfo::get_build_info;
pub use charts::{
    get_date_range, get_force_field, get_sentiment_over_time, get_severity_topics,
    get_topic_frequency,
};
pub use compare::get_comparison;
pub use error::ApiError;
pub use health::health_routes;
pub use sankey::get_sankey;
