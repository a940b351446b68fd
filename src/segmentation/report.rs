use chrono::{DateTime, Utc};

use crate::error::{ChainError, ChainResult};
use crate::models::{Chain, ChainReport, Phase, Question, ReportMetadata, TimeRange};
use crate::outline::{phase_windows, OutlineNode};
use crate::segmentation::algorithm::{build_chains, sort_by_begin_time};
use crate::segmentation::config::ChainConfig;
use crate::segmentation::phases::build_phase_chains;

pub const STRUCTURED_PROCESSING_METHOD: &str = "structured_by_teaching_phases";

/// Earliest begin and latest end over `questions`.
pub fn time_range(questions: &[Question]) -> ChainResult<TimeRange> {
    let first = questions.first().ok_or(ChainError::NoData)?;
    Ok(questions.iter().fold(
        TimeRange {
            start: first.begin_time,
            end: first.effective_end(),
        },
        |range, q| TimeRange {
            start: range.start.min(q.begin_time),
            end: range.end.max(q.effective_end()),
        },
    ))
}

/// Flat, time-based segmentation of validated questions.
pub fn build_report(questions: Vec<Question>, config: &ChainConfig) -> ChainResult<ChainReport> {
    build_report_at(questions, config, Utc::now())
}

/// `build_report` with a caller-supplied generation timestamp.
pub fn build_report_at(
    mut questions: Vec<Question>,
    config: &ChainConfig,
    processed_at: DateTime<Utc>,
) -> ChainResult<ChainReport> {
    config.validate()?;
    sort_by_begin_time(&mut questions);
    let range = time_range(&questions)?;
    let total_questions = questions.len();

    let chains = build_chains(questions, config);
    Ok(assemble(total_questions, range, chains, Vec::new(), None, processed_at))
}

/// One value-selected chain per externally supplied phase window.
pub fn build_phase_report(
    questions: Vec<Question>,
    phases: &[Phase],
    config: &ChainConfig,
) -> ChainResult<ChainReport> {
    build_phase_report_at(questions, phases, config, Utc::now())
}

pub fn build_phase_report_at(
    mut questions: Vec<Question>,
    phases: &[Phase],
    config: &ChainConfig,
    processed_at: DateTime<Utc>,
) -> ChainResult<ChainReport> {
    config.validate()?;
    sort_by_begin_time(&mut questions);
    let range = time_range(&questions)?;

    let result = build_phase_chains(&questions, phases, config);
    Ok(assemble(
        questions.len(),
        range,
        result.chains,
        result.skipped,
        Some(STRUCTURED_PROCESSING_METHOD.to_string()),
        processed_at,
    ))
}

/// Phase report with windows derived from a lesson outline.
pub fn build_outline_report(
    questions: Vec<Question>,
    outline: &OutlineNode,
    config: &ChainConfig,
) -> ChainResult<ChainReport> {
    if questions.is_empty() {
        return Err(ChainError::NoData);
    }
    let phases = phase_windows(outline, &questions);
    build_phase_report(questions, &phases, config)
}

fn assemble(
    total_questions: usize,
    time_range: TimeRange,
    chains: Vec<Chain>,
    skipped_phases: Vec<Phase>,
    processing_method: Option<String>,
    processed_at: DateTime<Utc>,
) -> ChainReport {
    ChainReport {
        metadata: ReportMetadata {
            total_questions,
            total_chains: chains.len(),
            time_range,
            processed_at,
            processing_method,
            skipped_phases,
        },
        chains,
    }
}
