//! Node and link coloring
//!
//! Root and sentiment nodes have fixed colors, adjectives come from the
//! emotion color table, and each topic takes the color of the adjective that
//! feeds it the most flow. Links reuse their source node's color at a fixed
//! alpha.

use std::collections::HashMap;

use super::assemble::FlowGraph;
use super::tree::Level;
use super::SentimentBucket;

/// Root, category and fallback color
pub const DEFAULT_GRAY: &str = "#B8BABD";

/// Alpha applied to every link color
pub const LINK_ALPHA: f64 = 0.5;

/// Emotion label to hex color. Lookups are case-insensitive.
pub struct ColorTable;

impl ColorTable {
    const ENTRIES: [(&'static str, &'static str); 7] = [
        ("joy", "#0B6E4F"),
        ("neutral", "#fa9f42"),
        ("surprise", "#fa9f42"),
        ("sadness", "#721817"),
        ("fear", "#721817"),
        ("disgust", "#721817"),
        ("anger", "#721817"),
    ];

    pub fn lookup(adjective: &str) -> Option<&'static str> {
        let key = adjective.trim();
        Self::ENTRIES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, color)| *color)
    }

    /// Table color, or gray for unmapped labels
    pub fn color_for(adjective: &str) -> &'static str {
        Self::lookup(adjective).unwrap_or(DEFAULT_GRAY)
    }
}

/// Assign node colors in place
pub fn propagate_colors(graph: &mut FlowGraph) {
    let dominant = dominant_adjectives(graph);

    let colors: Vec<&'static str> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| match node.level {
            Level::Root | Level::Category => DEFAULT_GRAY,
            Level::Sentiment => SentimentBucket::from_label(&node.label)
                .map(|b| b.color())
                .unwrap_or(DEFAULT_GRAY),
            Level::Adjective => ColorTable::color_for(&node.label),
            Level::Topic => dominant
                .get(&index)
                .map(|&adjective| ColorTable::color_for(&graph.nodes[adjective].label))
                .unwrap_or(DEFAULT_GRAY),
        })
        .collect();

    for (node, color) in graph.nodes.iter_mut().zip(colors) {
        node.color = color.to_string();
    }
}

/// Topic index -> index of the adjective supplying the most flow into it.
///
/// Flows are summed per adjective node first. The first adjective (edge
/// order) to reach the maximum wins a tie.
fn dominant_adjectives(graph: &FlowGraph) -> HashMap<usize, usize> {
    let mut flows: HashMap<usize, Vec<(usize, u64)>> = HashMap::new();
    for edge in &graph.edges {
        if graph.nodes[edge.target].level != Level::Topic
            || graph.nodes[edge.source].level != Level::Adjective
        {
            continue;
        }
        let per_adjective = flows.entry(edge.target).or_default();
        match per_adjective.iter_mut().find(|(adj, _)| *adj == edge.source) {
            Some((_, total)) => *total += edge.value,
            None => per_adjective.push((edge.source, edge.value)),
        }
    }

    flows
        .into_iter()
        .filter_map(|(topic, per_adjective)| {
            let mut best: Option<(usize, u64)> = None;
            for (adjective, total) in per_adjective {
                if best.map_or(true, |(_, max)| total > max) {
                    best = Some((adjective, total));
                }
            }
            best.map(|(adjective, _)| (topic, adjective))
        })
        .collect()
}

/// Parse `#RRGGBB` or `#RGB`
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().trim_start_matches('#');
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// `rgba(r, g, b, alpha)` for a hex color; unparsable input falls back to gray
pub fn hex_to_rgba(hex: &str, alpha: f64) -> String {
    let (r, g, b) = hex_to_rgb(hex)
        .or_else(|| hex_to_rgb(DEFAULT_GRAY))
        .unwrap_or((0xB8, 0xBA, 0xBD));
    format!("rgba({}, {}, {}, {})", r, g, b, alpha)
}

/// Color every link from its source node
pub fn colorize_links(graph: &mut FlowGraph, alpha: f64) {
    let FlowGraph { nodes, edges } = graph;
    for edge in edges.iter_mut() {
        edge.color = hex_to_rgba(&nodes[edge.source].color, alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{build_flow_graph, EventRecord, FlowOptions, GraphNode};

    #[test]
    fn test_color_table_is_case_insensitive() {
        assert_eq!(ColorTable::lookup("JOY"), Some("#0B6E4F"));
        assert_eq!(ColorTable::lookup("Anger"), Some("#721817"));
        assert_eq!(ColorTable::lookup("surprise"), Some("#fa9f42"));
        assert_eq!(ColorTable::lookup("boredom"), None);
        assert_eq!(ColorTable::color_for("boredom"), DEFAULT_GRAY);
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#0B6E4F"), Some((11, 110, 79)));
        assert_eq!(hex_to_rgb("fa9f42"), Some((250, 159, 66)));
        assert_eq!(hex_to_rgb("#abc"), Some((0xaa, 0xbb, 0xcc)));
        assert_eq!(hex_to_rgb("#12345"), None);
        assert_eq!(hex_to_rgb("#zzzzzz"), None);
    }

    #[test]
    fn test_hex_to_rgba_format() {
        assert_eq!(hex_to_rgba("#721817", 0.5), "rgba(114, 24, 23, 0.5)");
        assert_eq!(hex_to_rgba("not-a-color", 0.5), "rgba(184, 186, 189, 0.5)");
    }

    #[test]
    fn test_fixed_and_table_colors() {
        let graph = build_flow_graph(
            &[
                EventRecord::new(2, 10, "joy", "T1"),
                EventRecord::new(8, 5, "Melancholy", "T2"),
            ],
            &FlowOptions::default(),
        );
        let color_of = |level, label| {
            graph.nodes[graph.node_index(level, label).unwrap()].color.as_str()
        };
        assert_eq!(color_of(Level::Root, "Reddit Posts"), DEFAULT_GRAY);
        assert_eq!(color_of(Level::Sentiment, "Positive"), "#0B6E4F");
        assert_eq!(color_of(Level::Sentiment, "Neutral"), "#fa9f42");
        assert_eq!(color_of(Level::Sentiment, "Negative"), "#721817");
        assert_eq!(color_of(Level::Adjective, "joy"), "#0B6E4F");
        assert_eq!(color_of(Level::Adjective, "Melancholy"), DEFAULT_GRAY);
        assert_eq!(color_of(Level::Topic, "T2"), DEFAULT_GRAY);
    }

    #[test]
    fn test_dominant_adjective_sums_across_buckets() {
        // anger feeds Rent from two buckets (4 + 4) and beats joy (6)
        let graph = build_flow_graph(
            &[
                EventRecord::new(2, 6, "joy", "Rent"),
                EventRecord::new(7, 4, "anger", "Rent"),
                EventRecord::new(3, 4, "anger", "Rent"),
            ],
            &FlowOptions::default(),
        );
        let rent = graph.node_index(Level::Topic, "Rent").unwrap();
        assert_eq!(graph.nodes[rent].color, "#721817");
    }

    #[test]
    fn test_dominant_tie_goes_to_first_adjective() {
        let graph = build_flow_graph(
            &[
                EventRecord::new(8, 5, "fear", "Tie"),
                EventRecord::new(2, 5, "joy", "Tie"),
            ],
            &FlowOptions::default(),
        );
        // Positive is walked first, so joy is the first adjective to reach 5
        let tie = graph.node_index(Level::Topic, "Tie").unwrap();
        assert_eq!(graph.nodes[tie].color, "#0B6E4F");
    }

    #[test]
    fn test_topic_without_inbound_flow_is_gray() {
        let node = |label: &str, level| GraphNode {
            label: label.to_string(),
            level,
            color: String::new(),
        };
        let mut graph = FlowGraph {
            nodes: vec![node("Reddit Posts", Level::Root), node("Silent", Level::Topic)],
            edges: Vec::new(),
        };
        propagate_colors(&mut graph);
        assert_eq!(graph.nodes[1].color, DEFAULT_GRAY);
    }

    #[test]
    fn test_links_take_source_color() {
        let graph = build_flow_graph(&[EventRecord::new(8, 5, "joy", "T")], &FlowOptions::default());
        for edge in &graph.edges {
            let expected = hex_to_rgba(&graph.nodes[edge.source].color, LINK_ALPHA);
            assert_eq!(edge.color, expected);
        }
        // root -> Negative link is gray even though the target is dark red
        assert_eq!(graph.edges[0].color, "rgba(184, 186, 189, 0.5)");
    }
}
