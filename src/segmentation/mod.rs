pub mod algorithm;
pub mod boundary;
pub mod characterize;
pub mod config;
pub mod phases;
pub mod report;
pub mod selection;
pub mod weights;

pub use algorithm::{build_chains, ingest, sort_by_begin_time, ChainBuilder, ChainDraft};
pub use boundary::{BoundaryPolicy, ThresholdPolicy, WholeWindowPolicy};
pub use config::{
    BoundaryThresholds, ChainConfig, CharacterizationConfig, ProgressionRule, SelectionConfig,
    ValueScoreWeights,
};
pub use phases::{build_phase_chains, PhaseChains};
pub use report::{
    build_outline_report, build_phase_report, build_phase_report_at, build_report,
    build_report_at, time_range,
};
pub use selection::{select_high_value, value_score, ScoredQuestion};
pub use weights::WeightTables;
