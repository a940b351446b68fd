use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{chain::Chain, phase::Phase};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub total_questions: usize,
    pub total_chains: usize,
    pub time_range: TimeRange,
    pub processed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_method: Option<String>,
    /// Phases that had no matching question and produced no chain.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_phases: Vec<Phase>,
}

/// The persisted result of one segmentation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainReport {
    pub metadata: ReportMetadata,
    pub chains: Vec<Chain>,
}
