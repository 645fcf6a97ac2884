//! Aggregation tree
//!
//! Impressions are accumulated into an arena of typed nodes keyed
//! bucket → [category] → adjective → topic. Every node keeps its children in
//! first-seen order and carries the sum of its subtree, so the tree
//! serializes identically for any ordering of the same input rows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EventRecord, FlowDepth, SentimentBucket};

/// Depth level of a node in the flow hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Root,
    Sentiment,
    Category,
    Adjective,
    Topic,
}

/// Index of a node in the tree arena
pub type NodeId = usize;

/// One aggregation node
#[derive(Debug, Clone)]
pub struct AggregationNode {
    pub label: String,
    pub level: Level,
    /// Sum of impressions in this subtree
    pub weight: u64,
    children: Vec<NodeId>,
    child_index: HashMap<String, NodeId>,
}

impl AggregationNode {
    fn new(label: &str, level: Level) -> Self {
        Self {
            label: label.to_string(),
            level,
            weight: 0,
            children: Vec::new(),
            child_index: HashMap::new(),
        }
    }

    /// Children in first-seen order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Per-topic totals across every bucket and branch, in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicTotals {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl TopicTotals {
    pub fn add(&mut self, topic: &str, weight: u64) {
        match self.index.get(topic) {
            Some(&i) => self.entries[i].1 += weight,
            None => {
                self.index.insert(topic.to_string(), self.entries.len());
                self.entries.push((topic.to_string(), weight));
            }
        }
    }

    pub fn get(&self, topic: &str) -> Option<u64> {
        self.index.get(topic).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(topic, total)` pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(t, w)| (t.as_str(), *w))
    }

    /// Drop every topic for which `keep` returns false
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.entries.retain(|(t, _)| keep(t));
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (t, _))| (t.clone(), i))
            .collect();
    }
}

/// Arena-backed aggregation tree
#[derive(Debug, Clone)]
pub struct AggregationTree {
    nodes: Vec<AggregationNode>,
    depth: FlowDepth,
    topic_totals: TopicTotals,
}

impl AggregationTree {
    /// Arena index of the synthetic root
    pub const ROOT: NodeId = 0;

    pub fn new(depth: FlowDepth) -> Self {
        Self {
            nodes: vec![AggregationNode::new("", Level::Root)],
            depth,
            topic_totals: TopicTotals::default(),
        }
    }

    pub fn depth(&self) -> FlowDepth {
        self.depth
    }

    pub fn node(&self, id: NodeId) -> &AggregationNode {
        &self.nodes[id]
    }

    /// Number of nodes including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no row reached the tree
    pub fn is_empty(&self) -> bool {
        self.nodes[Self::ROOT].is_leaf()
    }

    /// Total weight under the root
    pub fn total(&self) -> u64 {
        self.nodes[Self::ROOT].weight
    }

    pub fn child(&self, parent: NodeId, label: &str) -> Option<NodeId> {
        self.nodes[parent].child_index.get(label).copied()
    }

    pub fn bucket(&self, bucket: SentimentBucket) -> Option<NodeId> {
        self.child(Self::ROOT, bucket.label())
    }

    pub fn topic_totals(&self) -> &TopicTotals {
        &self.topic_totals
    }

    pub(crate) fn set_topic_totals(&mut self, totals: TopicTotals) {
        self.topic_totals = totals;
    }

    /// Add `weight` along a label path below the root, creating nodes on first sight
    pub(crate) fn insert_path(&mut self, path: &[(Level, &str)], weight: u64) {
        let mut current = Self::ROOT;
        self.nodes[current].weight += weight;
        for &(level, label) in path {
            current = self.child_or_insert(current, level, label);
            self.nodes[current].weight += weight;
        }
    }

    fn child_or_insert(&mut self, parent: NodeId, level: Level, label: &str) -> NodeId {
        if let Some(id) = self.child(parent, label) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(AggregationNode::new(label, level));
        let parent_node = &mut self.nodes[parent];
        parent_node.children.push(id);
        parent_node.child_index.insert(label.to_string(), id);
        id
    }

    /// Visit every root-to-leaf path (root excluded) in depth-first insertion order
    pub fn walk_leaves<F: FnMut(&[NodeId])>(&self, mut visit: F) {
        let mut path = Vec::new();
        for &child in self.nodes[Self::ROOT].children() {
            self.walk_from(child, &mut path, &mut visit);
        }
    }

    fn walk_from<F: FnMut(&[NodeId])>(&self, id: NodeId, path: &mut Vec<NodeId>, visit: &mut F) {
        path.push(id);
        let node = &self.nodes[id];
        if node.is_leaf() {
            visit(path);
        } else {
            for &child in node.children() {
                self.walk_from(child, path, visit);
            }
        }
        path.pop();
    }
}

/// Accumulates event rows into an [`AggregationTree`]
#[derive(Debug)]
pub struct AggregationTreeBuilder {
    tree: AggregationTree,
    include_neutral: bool,
    accepted: usize,
    skipped: usize,
}

impl AggregationTreeBuilder {
    pub fn new(depth: FlowDepth) -> Self {
        Self {
            tree: AggregationTree::new(depth),
            include_neutral: true,
            accepted: 0,
            skipped: 0,
        }
    }

    /// Whether rows at the neutral midpoint are aggregated (default true)
    pub fn include_neutral(mut self, include: bool) -> Self {
        self.include_neutral = include;
        self
    }

    /// Accumulate one row. Returns false if the row was skipped.
    pub fn add(&mut self, record: &EventRecord) -> bool {
        let bucket = record.bucket();
        if bucket == SentimentBucket::Neutral && !self.include_neutral {
            self.skipped += 1;
            return false;
        }

        let sentiment = (Level::Sentiment, bucket.label());
        let adjective = (Level::Adjective, record.adjective.as_str());
        let topic = (Level::Topic, record.topic.as_str());
        match self.tree.depth {
            FlowDepth::Adjective => {
                self.tree.insert_path(&[sentiment, adjective, topic], record.impressions)
            }
            FlowDepth::CategoryAdjective => {
                let category = (Level::Category, record.category_label());
                self.tree
                    .insert_path(&[sentiment, category, adjective, topic], record.impressions)
            }
        }
        self.tree.topic_totals.add(&record.topic, record.impressions);
        self.accepted += 1;
        true
    }

    pub fn extend<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a EventRecord>,
    {
        for record in records {
            self.add(record);
        }
    }

    pub fn finish(self) -> AggregationTree {
        debug!(
            accepted = self.accepted,
            skipped = self.skipped,
            topics = self.tree.topic_totals.len(),
            total = self.tree.total(),
            "Aggregation tree built"
        );
        self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(depth: FlowDepth, records: &[EventRecord]) -> AggregationTree {
        let mut builder = AggregationTreeBuilder::new(depth);
        builder.extend(records);
        builder.finish()
    }

    fn labels(tree: &AggregationTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|&id| tree.node(id).label.clone()).collect()
    }

    #[test]
    fn test_accumulates_along_path() {
        let tree = build(
            FlowDepth::Adjective,
            &[
                EventRecord::new(2, 10, "joy", "T1"),
                EventRecord::new(3, 4, "joy", "T1"),
                EventRecord::new(1, 6, "joy", "T2"),
            ],
        );

        let pos = tree.bucket(SentimentBucket::Positive).unwrap();
        let joy = tree.child(pos, "joy").unwrap();
        let t1 = tree.child(joy, "T1").unwrap();

        assert_eq!(tree.total(), 20);
        assert_eq!(tree.node(pos).weight, 20);
        assert_eq!(tree.node(joy).weight, 20);
        assert_eq!(tree.node(t1).weight, 14);
        assert_eq!(tree.node(t1).level, Level::Topic);
        assert_eq!(tree.topic_totals().get("T1"), Some(14));
        assert_eq!(tree.topic_totals().get("T2"), Some(6));
    }

    #[test]
    fn test_children_keep_first_seen_order() {
        let tree = build(
            FlowDepth::Adjective,
            &[
                EventRecord::new(2, 1, "joy", "Zeta"),
                EventRecord::new(2, 1, "surprise", "Alpha"),
                EventRecord::new(2, 1, "joy", "Alpha"),
            ],
        );
        let pos = tree.bucket(SentimentBucket::Positive).unwrap();
        assert_eq!(labels(&tree, tree.node(pos).children()), vec!["joy", "surprise"]);

        let joy = tree.child(pos, "joy").unwrap();
        assert_eq!(labels(&tree, tree.node(joy).children()), vec!["Zeta", "Alpha"]);

        let order: Vec<&str> = tree.topic_totals().iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_category_depth_inserts_category_tier() {
        let tree = build(
            FlowDepth::CategoryAdjective,
            &[
                EventRecord::new(8, 5, "anger", "Fares").with_category("Transport"),
                EventRecord::new(8, 2, "anger", "Weather"),
            ],
        );
        let neg = tree.bucket(SentimentBucket::Negative).unwrap();
        assert_eq!(
            labels(&tree, tree.node(neg).children()),
            vec!["Transport", crate::flow::record::UNCATEGORIZED]
        );
        let transport = tree.child(neg, "Transport").unwrap();
        assert_eq!(tree.node(transport).level, Level::Category);
        let anger = tree.child(transport, "anger").unwrap();
        assert_eq!(tree.node(anger).level, Level::Adjective);
        assert_eq!(tree.node(anger).weight, 5);
    }

    #[test]
    fn test_neutral_rows_can_be_excluded() {
        let records = [
            EventRecord::new(5, 3, "surprise", "T1"),
            EventRecord::new(2, 10, "joy", "T1"),
        ];
        let mut builder = AggregationTreeBuilder::new(FlowDepth::Adjective).include_neutral(false);
        assert!(!builder.add(&records[0]));
        assert!(builder.add(&records[1]));
        let tree = builder.finish();

        assert!(tree.bucket(SentimentBucket::Neutral).is_none());
        assert_eq!(tree.topic_totals().get("T1"), Some(10));
        assert_eq!(tree.total(), 10);
    }

    #[test]
    fn test_walk_leaves_visits_paths_in_order() {
        let tree = build(
            FlowDepth::Adjective,
            &[
                EventRecord::new(8, 1, "fear", "B"),
                EventRecord::new(2, 1, "joy", "A"),
                EventRecord::new(8, 1, "fear", "C"),
            ],
        );
        let mut paths = Vec::new();
        tree.walk_leaves(|path| paths.push(labels(&tree, path).join("/")));
        assert_eq!(paths, vec!["Negative/fear/B", "Negative/fear/C", "Positive/joy/A"]);
    }

    #[test]
    fn test_empty_tree() {
        let tree = build(FlowDepth::Adjective, &[]);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.total(), 0);
        assert!(tree.topic_totals().is_empty());
    }

    #[test]
    fn test_topic_totals_retain_reindexes() {
        let mut totals = TopicTotals::default();
        totals.add("a", 1);
        totals.add("b", 2);
        totals.add("c", 3);
        totals.retain(|t| t != "a");
        assert_eq!(totals.len(), 2);
        assert_eq!(totals.get("a"), None);
        assert_eq!(totals.get("c"), Some(3));
        totals.add("c", 1);
        assert_eq!(totals.get("c"), Some(4));
    }
}
