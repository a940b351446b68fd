//! Classroom question records.
//!
//! `RawQuestion` mirrors the persisted JSON exactly as an upstream extractor
//! writes it. `Question` is the validated, normalized form the segmentation
//! core works on; it serializes back to the same field names.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields the chain builder stamps onto every question; stale copies from a
/// previous run are dropped at ingest so they cannot collide on output.
const DERIVED_FIELDS: [&str; 3] = ["chainIndex", "relativeTime", "valueScore"];

/// Four-type ("四何") question intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TopicCategory {
    #[serde(rename = "是何", alias = "WHAT")]
    What,
    #[serde(rename = "如何", alias = "HOW")]
    How,
    #[serde(rename = "为何", alias = "WHY")]
    Why,
    #[serde(rename = "若何", alias = "WHATIF")]
    WhatIf,
    #[default]
    #[serde(rename = "其他", alias = "OTHER")]
    Other,
}

impl TopicCategory {
    pub const ALL: [TopicCategory; 5] = [
        TopicCategory::What,
        TopicCategory::How,
        TopicCategory::Why,
        TopicCategory::WhatIf,
        TopicCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicCategory::What => "是何",
            TopicCategory::How => "如何",
            TopicCategory::Why => "为何",
            TopicCategory::WhatIf => "若何",
            TopicCategory::Other => "其他",
        }
    }

    fn english(&self) -> &'static str {
        match self {
            TopicCategory::What => "WHAT",
            TopicCategory::How => "HOW",
            TopicCategory::Why => "WHY",
            TopicCategory::WhatIf => "WHATIF",
            TopicCategory::Other => "OTHER",
        }
    }

    /// Resolve a raw label. Missing or unrecognized labels become `Other`.
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label.map(str::trim) else {
            return TopicCategory::Other;
        };
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == label || t.english().eq_ignore_ascii_case(label))
            .unwrap_or(TopicCategory::Other)
    }
}

/// Bloom cognitive level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CognitiveLevel {
    #[serde(rename = "记忆", alias = "REMEMBER")]
    Remember,
    #[serde(rename = "理解", alias = "UNDERSTAND")]
    Understand,
    #[serde(rename = "应用", alias = "APPLY")]
    Apply,
    #[serde(rename = "分析", alias = "ANALYZE")]
    Analyze,
    #[serde(rename = "评价", alias = "EVALUATE")]
    Evaluate,
    #[serde(rename = "创造", alias = "CREATE")]
    Create,
    #[default]
    #[serde(rename = "其他", alias = "OTHER")]
    Other,
}

impl CognitiveLevel {
    pub const ALL: [CognitiveLevel; 7] = [
        CognitiveLevel::Remember,
        CognitiveLevel::Understand,
        CognitiveLevel::Apply,
        CognitiveLevel::Analyze,
        CognitiveLevel::Evaluate,
        CognitiveLevel::Create,
        CognitiveLevel::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CognitiveLevel::Remember => "记忆",
            CognitiveLevel::Understand => "理解",
            CognitiveLevel::Apply => "应用",
            CognitiveLevel::Analyze => "分析",
            CognitiveLevel::Evaluate => "评价",
            CognitiveLevel::Create => "创造",
            CognitiveLevel::Other => "其他",
        }
    }

    fn english(&self) -> &'static str {
        match self {
            CognitiveLevel::Remember => "REMEMBER",
            CognitiveLevel::Understand => "UNDERSTAND",
            CognitiveLevel::Apply => "APPLY",
            CognitiveLevel::Analyze => "ANALYZE",
            CognitiveLevel::Evaluate => "EVALUATE",
            CognitiveLevel::Create => "CREATE",
            CognitiveLevel::Other => "OTHER",
        }
    }

    /// Resolve a raw label. Missing or unrecognized labels become `Other`.
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label.map(str::trim) else {
            return CognitiveLevel::Other;
        };
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == label || l.english().eq_ignore_ascii_case(label))
            .unwrap_or(CognitiveLevel::Other)
    }
}

/// Sentiment sub-object attached by the upstream sentiment pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sentiment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
}

/// A question record as read from storage. Nothing is validated yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuestion {
    pub question: Option<String>,
    pub begin_time: Option<f64>,
    pub end_time: Option<f64>,
    pub mat: Option<String>,
    pub blm_type: Option<String>,
    pub answered: Option<bool>,
    pub comment: Option<String>,
    pub feedback_type: Option<String>,
    #[serde(rename = "question_sentiment")]
    pub sentiment: Option<Sentiment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A validated question: has non-empty text and a finite begin time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    pub begin_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    #[serde(rename = "mat")]
    pub topic: TopicCategory,
    #[serde(rename = "blmType")]
    pub cognitive_level: CognitiveLevel,
    pub answered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_type: Option<String>,
    #[serde(rename = "question_sentiment", skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Question {
    pub fn new(text: impl Into<String>, begin_time: f64) -> Self {
        Self {
            text: text.into(),
            begin_time,
            end_time: None,
            topic: TopicCategory::Other,
            cognitive_level: CognitiveLevel::Other,
            answered: false,
            comment: None,
            feedback_type: None,
            sentiment: None,
            extra: Map::new(),
        }
    }

    /// Validate and normalize a raw record.
    ///
    /// Returns `None` for records without text or without a finite begin time.
    /// An end time earlier than the begin time is clamped to the begin time.
    pub fn from_raw(raw: RawQuestion) -> Option<Self> {
        let text = raw.question.filter(|t| !t.is_empty())?;
        let begin_time = raw.begin_time.filter(|t| t.is_finite())?;
        let end_time = raw
            .end_time
            .filter(|t| t.is_finite())
            .map(|end| end.max(begin_time));

        let mut extra = raw.extra;
        for field in DERIVED_FIELDS {
            extra.remove(field);
        }

        Some(Self {
            text,
            begin_time,
            end_time,
            topic: TopicCategory::from_label(raw.mat.as_deref()),
            cognitive_level: CognitiveLevel::from_label(raw.blm_type.as_deref()),
            answered: raw.answered.unwrap_or(false),
            comment: raw.comment,
            feedback_type: raw.feedback_type,
            sentiment: raw.sentiment,
            extra,
        })
    }

    pub fn ending_at(mut self, end_time: f64) -> Self {
        self.end_time = Some(end_time.max(self.begin_time));
        self
    }

    pub fn with_topic(mut self, topic: TopicCategory) -> Self {
        self.topic = topic;
        self
    }

    pub fn with_level(mut self, level: CognitiveLevel) -> Self {
        self.cognitive_level = level;
        self
    }

    pub fn with_answered(mut self, answered: bool) -> Self {
        self.answered = answered;
        self
    }

    pub fn with_sentiment(mut self, score: f64) -> Self {
        self.sentiment = Some(Sentiment {
            score: Some(score),
            classification: None,
        });
        self
    }

    pub fn with_feedback(mut self, comment: impl Into<String>, feedback_type: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self.feedback_type = Some(feedback_type.into());
        self
    }

    /// End time, falling back to the begin time when absent.
    pub fn effective_end(&self) -> f64 {
        self.end_time.unwrap_or(self.begin_time)
    }

    /// Sentiment score, 0 when missing.
    pub fn sentiment_score(&self) -> f64 {
        self.sentiment.as_ref().and_then(|s| s.score).unwrap_or(0.0)
    }

    /// True when a non-empty comment exists and its tag is not the "no feedback" sentinel.
    pub fn has_feedback(&self, no_feedback_tag: &str) -> bool {
        let has_comment = self.comment.as_deref().is_some_and(|c| !c.is_empty());
        has_comment && self.feedback_type.as_deref() != Some(no_feedback_tag)
    }

    /// Length of the question text in characters.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}
