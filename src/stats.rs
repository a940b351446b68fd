use serde::{Deserialize, Serialize};

use crate::error::{ChainError, ChainResult};
use crate::models::{Question, TopicCategory};
use crate::segmentation::WeightTables;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionPattern {
    #[serde(rename = "前半段集中", alias = "frontLoaded")]
    FrontLoaded,
    #[serde(rename = "后半段集中", alias = "backLoaded")]
    BackLoaded,
    #[serde(rename = "均匀分布", alias = "even")]
    Even,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicCount {
    pub topic: TopicCategory,
    pub count: usize,
}

/// Pacing overview of a lesson's questions, independent of chaining.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStats {
    pub total_count: usize,
    /// Mean gap between consecutive questions, rounded to whole seconds.
    pub average_interval: f64,
    pub max_interval: f64,
    pub min_interval: f64,
    pub total_duration_minutes: i64,
    pub distribution_pattern: DistributionPattern,
    /// Every topic, lowest weight first.
    pub topic_distribution: Vec<TopicCount>,
}

pub fn timeline_stats(questions: &[Question], weights: &WeightTables) -> ChainResult<TimelineStats> {
    if questions.is_empty() {
        return Err(ChainError::NoData);
    }

    let mut begins: Vec<f64> = questions.iter().map(|q| q.begin_time).collect();
    begins.sort_by(f64::total_cmp);

    let intervals: Vec<f64> = begins.windows(2).map(|w| w[1] - w[0]).collect();
    let (average_interval, max_interval, min_interval) = if intervals.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let sum: f64 = intervals.iter().sum();
        (
            (sum / intervals.len() as f64).round(),
            intervals.iter().copied().fold(f64::MIN, f64::max),
            intervals.iter().copied().fold(f64::MAX, f64::min),
        )
    };

    let last_begin = begins.last().copied().unwrap_or(0.0);
    let midpoint = last_begin / 2.0;
    let first_half = begins.iter().filter(|&&t| t <= midpoint).count() as f64;
    let second_half = begins.len() as f64 - first_half;
    let distribution_pattern = if first_half > second_half * 1.5 {
        DistributionPattern::FrontLoaded
    } else if second_half > first_half * 1.5 {
        DistributionPattern::BackLoaded
    } else {
        DistributionPattern::Even
    };

    let mut topics = TopicCategory::ALL.to_vec();
    topics.sort_by_key(|t| weights.topic_weight(*t));
    let topic_distribution = topics
        .into_iter()
        .map(|topic| TopicCount {
            topic,
            count: questions.iter().filter(|q| q.topic == topic).count(),
        })
        .collect();

    Ok(TimelineStats {
        total_count: questions.len(),
        average_interval,
        max_interval,
        min_interval,
        total_duration_minutes: (last_begin / 60.0).round() as i64,
        distribution_pattern,
        topic_distribution,
    })
}
