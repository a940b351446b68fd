use thiserror::Error;

/// Errors that make a whole segmentation run meaningless.
///
/// Per-record problems (missing text, unknown labels, empty phases) never
/// surface here; they are normalized or skipped and the run continues.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChainError {
    #[error("no data: no question has both text and a begin time")]
    NoData,
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type ChainResult<T> = Result<T, ChainError>;
