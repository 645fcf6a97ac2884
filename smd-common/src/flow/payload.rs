//! Wire shape consumed by the flow-diagram renderer
//!
//! `{node: {label, color}, link: {source, target, value, color}}` with
//! parallel arrays, as expected by Plotly-style Sankey traces.

use serde::{Deserialize, Serialize};

use super::assemble::FlowGraph;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeArrays {
    pub label: Vec<String>,
    pub color: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkArrays {
    pub source: Vec<usize>,
    pub target: Vec<usize>,
    pub value: Vec<u64>,
    pub color: Vec<String>,
}

/// Serialized flow graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SankeyPayload {
    pub node: NodeArrays,
    pub link: LinkArrays,
}

impl From<&FlowGraph> for SankeyPayload {
    fn from(graph: &FlowGraph) -> Self {
        let mut payload = SankeyPayload::default();
        for node in &graph.nodes {
            payload.node.label.push(node.label.clone());
            payload.node.color.push(node.color.clone());
        }
        for edge in &graph.edges {
            payload.link.source.push(edge.source);
            payload.link.target.push(edge.target);
            payload.link.value.push(edge.value);
            payload.link.color.push(edge.color.clone());
        }
        payload
    }
}

impl From<FlowGraph> for SankeyPayload {
    fn from(graph: FlowGraph) -> Self {
        Self::from(&graph)
    }
}
