//! Graph assembly
//!
//! Turns a pruned aggregation tree into indexed node and edge lists. Node
//! indices are handed out level by level: root, the three sentiment buckets
//! in fixed order, then each deeper level in first-seen path order. Labels
//! are unique within a level, so a topic fed by several branches is a single
//! node with one inbound edge per branch.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::color::DEFAULT_GRAY;
use super::tree::{AggregationTree, Level, NodeId};
use super::{FlowDepth, SentimentBucket};

/// Node of the flow graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub label: String,
    pub level: Level,
    pub color: String,
}

/// Directed, weighted edge between two node indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: usize,
    pub target: usize,
    pub value: u64,
    pub color: String,
}

/// Multi-level flow graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl FlowGraph {
    /// Index of the node with `label` at `level`
    pub fn node_index(&self, level: Level, label: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.level == level && n.label == label)
    }

    pub fn inbound(&self, index: usize) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |e| e.target == index)
    }

    pub fn outbound(&self, index: usize) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |e| e.source == index)
    }

    pub fn incoming_total(&self, index: usize) -> u64 {
        self.inbound(index).map(|e| e.value).sum()
    }

    pub fn outgoing_total(&self, index: usize) -> u64 {
        self.outbound(index).map(|e| e.value).sum()
    }

    /// Flow leaving the root, i.e. all retained weight
    pub fn total_flow(&self) -> u64 {
        self.outgoing_total(0)
    }
}

/// Builds a [`FlowGraph`] from a pruned tree
#[derive(Debug, Clone)]
pub struct GraphAssembler {
    root_label: String,
}

impl GraphAssembler {
    pub fn new(root_label: impl Into<String>) -> Self {
        Self {
            root_label: root_label.into(),
        }
    }

    pub fn assemble(&self, tree: &AggregationTree) -> FlowGraph {
        let mut graph = FlowGraph::default();
        graph.nodes.push(node(&self.root_label, Level::Root));

        // Tree node -> graph index
        let mut placed: HashMap<NodeId, usize> = HashMap::new();
        let mut frontier = Vec::new();

        for bucket in SentimentBucket::ALL {
            let index = graph.nodes.len();
            graph.nodes.push(node(bucket.label(), Level::Sentiment));
            if let Some(id) = tree.bucket(bucket) {
                placed.insert(id, index);
                frontier.push(id);
            }
        }

        for &id in &frontier {
            push_edge(&mut graph, 0, placed[&id], tree.node(id).weight);
        }

        for level in intermediate_levels(tree.depth()) {
            let mut labels: HashMap<&str, usize> = HashMap::new();
            let mut next = Vec::new();

            for &parent in &frontier {
                let parent_index = placed[&parent];
                for &child in tree.node(parent).children() {
                    let child_node = tree.node(child);
                    debug_assert_eq!(child_node.level, *level);
                    let index = *labels.entry(child_node.label.as_str()).or_insert_with(|| {
                        graph.nodes.push(node(&child_node.label, *level));
                        graph.nodes.len() - 1
                    });
                    placed.insert(child, index);
                    push_edge(&mut graph, parent_index, index, child_node.weight);
                    next.push(child);
                }
            }
            frontier = next;
        }

        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            flow = graph.total_flow(),
            "Flow graph assembled"
        );
        graph
    }
}

fn intermediate_levels(depth: FlowDepth) -> &'static [Level] {
    match depth {
        FlowDepth::Adjective => &[Level::Adjective, Level::Topic],
        FlowDepth::CategoryAdjective => &[Level::Category, Level::Adjective, Level::Topic],
    }
}

fn node(label: &str, level: Level) -> GraphNode {
    GraphNode {
        label: label.to_string(),
        level,
        color: DEFAULT_GRAY.to_string(),
    }
}

fn push_edge(graph: &mut FlowGraph, source: usize, target: usize, value: u64) {
    if value == 0 {
        return;
    }
    graph.edges.push(GraphEdge {
        source,
        target,
        value,
        color: String::new(),
    });
}
