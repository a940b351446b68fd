use serde::{Deserialize, Serialize};

use super::question::{CognitiveLevel, Question, TopicCategory};

/// A question placed inside a chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainedQuestion {
    #[serde(flatten)]
    pub question: Question,
    pub chain_index: usize,
    /// Seconds since the owning chain's start.
    pub relative_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentClass {
    #[serde(rename = "积极", alias = "positive")]
    Positive,
    #[serde(rename = "中性", alias = "neutral")]
    Neutral,
    #[serde(rename = "消极", alias = "negative")]
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressionPattern {
    #[serde(rename = "递进为主", alias = "progressive")]
    Progressive,
    #[serde(rename = "回退为主", alias = "regressive")]
    Regressive,
    #[serde(rename = "稳定为主", alias = "stable")]
    Stable,
}

/// How cognitive levels move between consecutive questions of a chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BloomProgression {
    pub pattern: ProgressionPattern,
    pub ascending: usize,
    pub descending: usize,
    pub stable: usize,
    pub progression_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Characteristics {
    pub has_answers: bool,
    pub has_feedback: bool,
    pub avg_sentiment: f64,
    pub sentiment_classification: SentimentClass,
    pub bloom_progression: BloomProgression,
    /// Questions per minute, with the duration floored at one minute.
    pub intensity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_value_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub start: f64,
    pub end: f64,
    pub start_minute: i64,
    pub end_minute: i64,
    pub duration: f64,
}

impl Timeline {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            start_minute: (start / 60.0).floor() as i64,
            end_minute: (end / 60.0).floor() as i64,
            duration: end - start,
        }
    }
}

/// A finalized question chain. Never modified after the builder emits it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teaching_phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_question: Option<String>,
    pub questions: Vec<ChainedQuestion>,
    pub start_time: f64,
    pub end_time: f64,
    pub primary_topic: TopicCategory,
    #[serde(rename = "primaryBloomLevel")]
    pub primary_cognitive_level: CognitiveLevel,
    pub duration: f64,
    pub question_count: usize,
    pub characteristics: Characteristics,
    pub timeline: Timeline,
}

impl Chain {
    pub fn question_texts(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(|q| q.question.text.as_str())
    }
}
