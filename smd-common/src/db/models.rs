//! Chart-data models

use serde::{Deserialize, Serialize};

use crate::Ratio;

/// Tracked entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSet {
    pub set_id: i64,
    pub name: String,
}

/// Per-day impressions by sentiment bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySentiment {
    pub date: String,
    pub positive: i64,
    pub neutral: i64,
    pub negative: i64,
}

/// Topic volume and its share of the set's total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicFrequency {
    pub topic: String,
    pub avg_severity: f64,
    pub total_impressions: i64,
    pub percentage_of_total: Ratio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceFieldTopic {
    pub topic: String,
    pub avg_severity: f64,
}

/// Topics split by which side of the neutral midpoint their average falls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForceField {
    pub positive: Vec<ForceFieldTopic>,
    pub negative: Vec<ForceFieldTopic>,
    /// Only populated when neutral topics are requested
    pub neutral: Vec<ForceFieldTopic>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSeverity {
    pub topic: String,
    pub max_severity: i64,
}

/// Impression-weighted average severity of a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAverage {
    pub topic: String,
    pub avg_severity: Ratio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAverage {
    pub date: String,
    pub avg_severity: Ratio,
}

/// Comparison figures for one set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetSummary {
    pub set_id: i64,
    pub net_severity: Ratio,
    pub most_positive: Vec<TopicAverage>,
    pub most_negative: Vec<TopicAverage>,
    pub time_series: Vec<DailyAverage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub set1: SetSummary,
    pub set2: SetSummary,
}
