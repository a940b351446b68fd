use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ChainError, ChainResult};
use crate::segmentation::weights::WeightTables;

/// Thresholds for the "start a new chain" rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoundaryThresholds {
    /// Any gap above this always breaks the chain.
    pub chain_break_secs: f64,

    /// A topic change breaks the chain once the gap exceeds this.
    pub topic_change_gap_secs: f64,

    /// Cognitive regression breaks the chain once the gap exceeds this.
    pub regression_gap_secs: f64,

    /// Regression applies when the chain's level weight is at least this...
    pub regression_from_weight: u32,

    /// ...and the incoming question's level weight is at most this.
    pub regression_to_weight: u32,
}

impl Default for BoundaryThresholds {
    fn default() -> Self {
        Self {
            chain_break_secs: 60.0,
            topic_change_gap_secs: 30.0,
            regression_gap_secs: 20.0,
            regression_from_weight: 4,
            regression_to_weight: 2,
        }
    }
}

/// Component weights of a question's value score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueScoreWeights {
    pub cognitive: f64,
    pub question_type: f64,
    pub length: f64,
    pub answered: f64,
    /// Characters per length point.
    pub length_divisor: f64,
    pub length_cap: f64,
}

impl Default for ValueScoreWeights {
    fn default() -> Self {
        Self {
            cognitive: 0.4,
            question_type: 0.3,
            length: 0.2,
            answered: 0.1,
            length_divisor: 20.0,
            length_cap: 3.0,
        }
    }
}

/// Bounds for the per-phase value selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectionConfig {
    /// Soft minimum: phases with fewer candidates keep what they have.
    pub min_count: usize,
    pub max_count: usize,
    /// Scores above this are always kept while there is room.
    pub high_value_score: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_count: 3,
            max_count: 8,
            high_value_score: 3.0,
        }
    }
}

/// How ascending/descending step counts map to a progression pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ProgressionRule {
    #[default]
    /// Progressive if more ascending than descending steps, regressive for
    /// the converse, stable on ties.
    Majority,
    /// Progressive if `ascending / total > progressive_above`; regressive if
    /// descending outnumbers ascending and `descending / total > regressive_above`.
    #[serde(rename_all = "camelCase")]
    Ratio {
        progressive_above: f64,
        regressive_above: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterizationConfig {
    /// Average sentiment strictly above this is positive.
    pub positive_above: f64,
    /// Average sentiment strictly below this is negative.
    pub negative_below: f64,
    /// Feedback tag meaning "no feedback was given".
    pub no_feedback_tag: String,
    pub progression_rule: ProgressionRule,
}

impl Default for CharacterizationConfig {
    fn default() -> Self {
        Self {
            positive_above: 0.6,
            negative_below: 0.3,
            no_feedback_tag: "无反馈".into(),
            progression_rule: ProgressionRule::Majority,
        }
    }
}

/// Every tunable of a segmentation run. Defaults match the persisted lesson
/// analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChainConfig {
    pub boundary: BoundaryThresholds,
    pub weights: WeightTables,
    pub value: ValueScoreWeights,
    pub selection: SelectionConfig,
    pub characterization: CharacterizationConfig,
    /// Phase name to the core question it is built around.
    pub core_questions: BTreeMap<String, String>,
    /// Fallback for phases missing from `core_questions`; `{phase}` is substituted.
    pub core_question_template: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            boundary: BoundaryThresholds::default(),
            weights: WeightTables::default(),
            value: ValueScoreWeights::default(),
            selection: SelectionConfig::default(),
            characterization: CharacterizationConfig::default(),
            core_questions: default_core_questions(),
            core_question_template: "{phase}的核心问题是什么？".into(),
        }
    }
}

fn default_core_questions() -> BTreeMap<String, String> {
    [
        ("一、回顾与引入新课", "什么是直角三角形，它有什么特殊性质？"),
        ("二、直角三角形性质探究", "直角三角形的边角关系有什么规律？"),
        ("1.直角三角形边角关系总结", "直角三角形三边之间有什么数量关系？"),
        ("2.勾股定理证明", "如何用严格的数学推理证明勾股定理？"),
        ("三、勾股定理应用练习", "如何运用勾股定理解决实际问题？"),
        ("四、课堂知识回顾与总结", "本节课学到了哪些重要的数学知识？"),
    ]
    .into_iter()
    .map(|(phase, question)| (phase.to_string(), question.to_string()))
    .collect()
}

impl ChainConfig {
    pub fn core_question_for(&self, phase: &str) -> String {
        self.core_questions
            .get(phase)
            .cloned()
            .unwrap_or_else(|| self.core_question_template.replace("{phase}", phase))
    }

    /// Reject settings that would make the pipeline produce meaningless output.
    pub fn validate(&self) -> ChainResult<()> {
        let b = &self.boundary;
        for (name, value) in [
            ("boundary.chainBreakSecs", b.chain_break_secs),
            ("boundary.topicChangeGapSecs", b.topic_change_gap_secs),
            ("boundary.regressionGapSecs", b.regression_gap_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{name} must be a non-negative number, got {value}")));
            }
        }

        let v = &self.value;
        for (name, value) in [
            ("value.cognitive", v.cognitive),
            ("value.questionType", v.question_type),
            ("value.length", v.length),
            ("value.answered", v.answered),
            ("value.lengthCap", v.length_cap),
        ] {
            if !value.is_finite() {
                return Err(invalid(format!("{name} must be finite, got {value}")));
            }
        }
        if !v.length_divisor.is_finite() || v.length_divisor <= 0.0 {
            return Err(invalid(format!(
                "value.lengthDivisor must be positive, got {}",
                v.length_divisor
            )));
        }

        let s = &self.selection;
        if s.max_count == 0 {
            return Err(invalid("selection.maxCount must be at least 1".into()));
        }
        if s.min_count > s.max_count {
            return Err(invalid(format!(
                "selection.minCount ({}) exceeds selection.maxCount ({})",
                s.min_count, s.max_count
            )));
        }

        let c = &self.characterization;
        if !c.positive_above.is_finite() || !c.negative_below.is_finite() {
            return Err(invalid("sentiment thresholds must be finite".into()));
        }
        if c.negative_below > c.positive_above {
            return Err(invalid(format!(
                "characterization.negativeBelow ({}) exceeds positiveAbove ({})",
                c.negative_below, c.positive_above
            )));
        }
        if let ProgressionRule::Ratio {
            progressive_above,
            regressive_above,
        } = c.progression_rule
        {
            if !progressive_above.is_finite() || !regressive_above.is_finite() {
                return Err(invalid("progression ratio thresholds must be finite".into()));
            }
        }

        Ok(())
    }
}

fn invalid(message: String) -> ChainError {
    ChainError::InvalidConfig(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ChainConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_min_above_max() {
        let mut config = ChainConfig::default();
        config.selection.min_count = 9;
        assert!(matches!(config.validate(), Err(ChainError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_negative_gap_and_zero_divisor() {
        let mut config = ChainConfig::default();
        config.boundary.chain_break_secs = -1.0;
        assert!(config.validate().is_err());

        let mut config = ChainConfig::default();
        config.value.length_divisor = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn core_question_falls_back_to_template() {
        let config = ChainConfig::default();
        assert_eq!(
            config.core_question_for("2.勾股定理证明"),
            "如何用严格的数学推理证明勾股定理？"
        );
        assert_eq!(config.core_question_for("五、拓展"), "五、拓展的核心问题是什么？");
    }

    #[test]
    fn progression_rule_parses_tagged_json() {
        let config: ChainConfig = serde_json::from_str(
            r#"{ "characterization": { "progressionRule": { "kind": "ratio", "progressiveAbove": 0.6, "regressiveAbove": 0.4 } } }"#,
        )
        .unwrap();
        assert_eq!(
            config.characterization.progression_rule,
            ProgressionRule::Ratio {
                progressive_above: 0.6,
                regressive_above: 0.4
            }
        );
        assert_eq!(config.characterization.no_feedback_tag, "无反馈");
        assert_eq!(config.selection.max_count, 8);
    }
}
