//! Top-K topic pruning

use std::collections::HashSet;

use tracing::debug;

use super::tree::{AggregationTree, Level, TopicTotals};

/// Number of topics kept in a flow diagram unless configured otherwise
pub const DEFAULT_TOPIC_LIMIT: usize = 12;

/// Labels of the `limit` heaviest topics, heaviest first.
///
/// The sort is stable, so topics with equal totals keep their first-seen order.
/// Topics with a zero total carry no flow and are never retained.
pub fn top_topics(totals: &TopicTotals, limit: usize) -> Vec<String> {
    let mut ranked: Vec<(&str, u64)> = totals.iter().filter(|&(_, total)| total > 0).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(limit)
        .map(|(topic, _)| topic.to_string())
        .collect()
}

/// Keeps only the top-K topics of an aggregation tree
#[derive(Debug, Clone, Copy)]
pub struct TopicPruner {
    limit: usize,
}

impl TopicPruner {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Rebuild `tree` with only retained topics.
    ///
    /// Branches left without a retained topic disappear; weights are the
    /// retained sums. Child order under each parent is unchanged.
    pub fn prune(&self, tree: &AggregationTree) -> AggregationTree {
        let retained: HashSet<String> = top_topics(tree.topic_totals(), self.limit)
            .into_iter()
            .collect();

        let mut pruned = AggregationTree::new(tree.depth());
        tree.walk_leaves(|path| {
            let Some(&leaf) = path.last() else {
                return;
            };
            let leaf = tree.node(leaf);
            if leaf.level != Level::Topic || !retained.contains(&leaf.label) {
                return;
            }
            let labels: Vec<(Level, &str)> = path
                .iter()
                .map(|&id| {
                    let node = tree.node(id);
                    (node.level, node.label.as_str())
                })
                .collect();
            pruned.insert_path(&labels, leaf.weight);
        });

        let mut totals = tree.topic_totals().clone();
        totals.retain(|topic| retained.contains(topic));
        pruned.set_topic_totals(totals);

        debug!(
            limit = self.limit,
            topics_before = tree.topic_totals().len(),
            topics_after = retained.len(),
            weight_before = tree.total(),
            weight_after = pruned.total(),
            "Pruned topics"
        );
        pruned
    }
}

impl Default for TopicPruner {
    fn default() -> Self {
        Self::new(DEFAULT_TOPIC_LIMIT)
    }
}
