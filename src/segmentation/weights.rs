use serde::{Deserialize, Serialize};

use crate::models::{CognitiveLevel, TopicCategory};

/// Ordinal weight per topic category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopicWeights {
    pub what: u32,
    pub how: u32,
    pub why: u32,
    pub what_if: u32,
    pub other: u32,
}

impl Default for TopicWeights {
    fn default() -> Self {
        Self {
            what: 1,
            how: 2,
            why: 3,
            what_if: 4,
            other: 0,
        }
    }
}

impl TopicWeights {
    pub fn get(&self, topic: TopicCategory) -> u32 {
        match topic {
            TopicCategory::What => self.what,
            TopicCategory::How => self.how,
            TopicCategory::Why => self.why,
            TopicCategory::WhatIf => self.what_if,
            TopicCategory::Other => self.other,
        }
    }
}

/// Ordinal weight per Bloom level, remember (1) through create (6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CognitiveWeights {
    pub remember: u32,
    pub understand: u32,
    pub apply: u32,
    pub analyze: u32,
    pub evaluate: u32,
    pub create: u32,
    pub other: u32,
}

impl Default for CognitiveWeights {
    fn default() -> Self {
        Self {
            remember: 1,
            understand: 2,
            apply: 3,
            analyze: 4,
            evaluate: 5,
            create: 6,
            other: 0,
        }
    }
}

impl CognitiveWeights {
    pub fn get(&self, level: CognitiveLevel) -> u32 {
        match level {
            CognitiveLevel::Remember => self.remember,
            CognitiveLevel::Understand => self.understand,
            CognitiveLevel::Apply => self.apply,
            CognitiveLevel::Analyze => self.analyze,
            CognitiveLevel::Evaluate => self.evaluate,
            CognitiveLevel::Create => self.create,
            CognitiveLevel::Other => self.other,
        }
    }
}

/// Value-scoring points per question type. Why-questions rank highest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionTypeScores {
    pub what: u32,
    pub how: u32,
    pub why: u32,
    pub what_if: u32,
    pub other: u32,
}

impl Default for QuestionTypeScores {
    fn default() -> Self {
        Self {
            what: 2,
            how: 3,
            why: 4,
            what_if: 3,
            other: 1,
        }
    }
}

impl QuestionTypeScores {
    pub fn get(&self, topic: TopicCategory) -> u32 {
        match topic {
            TopicCategory::What => self.what,
            TopicCategory::How => self.how,
            TopicCategory::Why => self.why,
            TopicCategory::WhatIf => self.what_if,
            TopicCategory::Other => self.other,
        }
    }
}

/// All label lookups, injected wherever a weight is needed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeightTables {
    pub topic: TopicWeights,
    pub cognitive: CognitiveWeights,
    pub question_type: QuestionTypeScores,
}

impl WeightTables {
    pub fn topic_weight(&self, topic: TopicCategory) -> u32 {
        self.topic.get(topic)
    }

    pub fn cognitive_weight(&self, level: CognitiveLevel) -> u32 {
        self.cognitive.get(level)
    }

    pub fn question_type_score(&self, topic: TopicCategory) -> u32 {
        self.question_type.get(topic)
    }
}
