use crate::models::Question;
use crate::segmentation::algorithm::ChainDraft;
use crate::segmentation::config::{BoundaryThresholds, ChainConfig};
use crate::segmentation::weights::WeightTables;

/// Decides whether `current` closes the open chain and starts a new one.
///
/// `previous` is the last question the builder processed; it is `None` only at
/// the start of the stream.
pub trait BoundaryPolicy {
    fn should_start_new_chain(
        &self,
        current: &Question,
        active: Option<&ChainDraft>,
        previous: Option<&Question>,
    ) -> bool;
}

/// Time-gap, topic-change and cognitive-regression rules, first match wins.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdPolicy<'a> {
    thresholds: &'a BoundaryThresholds,
    weights: &'a WeightTables,
}

impl<'a> ThresholdPolicy<'a> {
    pub fn new(thresholds: &'a BoundaryThresholds, weights: &'a WeightTables) -> Self {
        Self {
            thresholds,
            weights,
        }
    }

    pub fn from_config(config: &'a ChainConfig) -> Self {
        Self::new(&config.boundary, &config.weights)
    }
}

impl BoundaryPolicy for ThresholdPolicy<'_> {
    fn should_start_new_chain(
        &self,
        current: &Question,
        active: Option<&ChainDraft>,
        previous: Option<&Question>,
    ) -> bool {
        let (Some(chain), Some(previous)) = (active, previous) else {
            return true;
        };
        let t = self.thresholds;
        let gap = current.begin_time - previous.begin_time;

        if gap > t.chain_break_secs {
            return true;
        }

        if current.topic != chain.primary_topic() && gap > t.topic_change_gap_secs {
            return true;
        }

        // Steep drop from analysis-or-above back to recall after a pause.
        let chain_weight = self.weights.cognitive_weight(chain.primary_cognitive_level());
        let current_weight = self.weights.cognitive_weight(current.cognitive_level);
        chain_weight >= t.regression_from_weight
            && current_weight <= t.regression_to_weight
            && gap > t.regression_gap_secs
    }
}

/// Keeps every question in one chain; used when an external phase window
/// already defines the chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeWindowPolicy;

impl BoundaryPolicy for WholeWindowPolicy {
    fn should_start_new_chain(
        &self,
        _current: &Question,
        active: Option<&ChainDraft>,
        _previous: Option<&Question>,
    ) -> bool {
        active.is_none()
    }
}
