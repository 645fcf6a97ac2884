//! Flow-diagram engine
//!
//! Pipeline: rows → [`SentimentBucket::classify`] → [`AggregationTreeBuilder`]
//! → [`TopicPruner`] → [`GraphAssembler`] → [`propagate_colors`] →
//! [`colorize_links`]. Every stage is a pure function of its input; all
//! accumulators live in the stage that owns them.

pub mod assemble;
pub mod color;
pub mod feed;
pub mod payload;
pub mod prune;
pub mod record;
pub mod sentiment;
pub mod tree;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use assemble::{FlowGraph, GraphAssembler, GraphEdge, GraphNode};
pub use color::{colorize_links, hex_to_rgba, propagate_colors, ColorTable, DEFAULT_GRAY, LINK_ALPHA};
pub use feed::{EventFeed, MemoryFeed};
pub use payload::SankeyPayload;
pub use prune::{top_topics, TopicPruner, DEFAULT_TOPIC_LIMIT};
pub use record::{canonical_order, EventRecord};
pub use sentiment::{SentimentBucket, NEUTRAL_SEVERITY};
pub use tree::{AggregationNode, AggregationTree, AggregationTreeBuilder, Level, NodeId, TopicTotals};

use crate::{DateRange, Result};

/// Default label of the synthetic root node
pub const DEFAULT_ROOT_LABEL: &str = "Reddit Posts";

/// Hierarchy between sentiment and topic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowDepth {
    /// sentiment → adjective → topic
    #[default]
    #[serde(rename = "adjective")]
    Adjective,
    /// sentiment → category → adjective → topic
    #[serde(rename = "category", alias = "category_adjective")]
    CategoryAdjective,
}

/// Build-time options of the flow engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowOptions {
    pub depth: FlowDepth,
    /// Number of topics kept (K)
    pub topic_limit: usize,
    /// Aggregate rows at the neutral midpoint
    pub include_neutral: bool,
    pub root_label: String,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            depth: FlowDepth::default(),
            topic_limit: DEFAULT_TOPIC_LIMIT,
            include_neutral: true,
            root_label: DEFAULT_ROOT_LABEL.to_string(),
        }
    }
}

/// Build a colored flow graph from event rows.
///
/// Rows are aggregated in [`canonical_order`], so any permutation of the same
/// rows yields the same graph.
pub fn build_flow_graph(records: &[EventRecord], options: &FlowOptions) -> FlowGraph {
    let mut builder =
        AggregationTreeBuilder::new(options.depth).include_neutral(options.include_neutral);
    builder.extend(canonical_order(records));
    let tree = builder.finish();

    let pruned = TopicPruner::new(options.topic_limit).prune(&tree);

    let mut graph = GraphAssembler::new(options.root_label.as_str()).assemble(&pruned);
    propagate_colors(&mut graph);
    colorize_links(&mut graph, LINK_ALPHA);
    graph
}

/// Fetch rows for one set and range, then build its flow graph
pub async fn load_flow_graph<F>(
    feed: &F,
    set_id: i64,
    range: DateRange,
    options: &FlowOptions,
) -> Result<FlowGraph>
where
    F: EventFeed + ?Sized,
{
    let records = feed.fetch_events(set_id, range).await?;
    debug!(set_id, rows = records.len(), "Fetched flow rows");
    Ok(build_flow_graph(&records, options))
}
