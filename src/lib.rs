//! Question-chain segmentation for classroom questioning timelines.
//!
//! Questions tagged with a time, a four-type topic and a Bloom level are grouped
//! into chains of continuous inquiry, and each chain is characterized
//! (sentiment, cognitive progression, density). A phase-aware mode builds one
//! value-selected chain per teaching phase of a lesson outline instead.

pub mod commands;
pub mod error;
pub mod models;
pub mod outline;
pub mod segmentation;
pub mod settings;
pub mod stats;
mod utils;

use clap::Parser;

pub use error::{ChainError, ChainResult};
pub use models::{Chain, ChainReport, Phase, Question, RawQuestion};
pub use segmentation::{
    build_outline_report, build_phase_report, build_report, ingest, ChainConfig,
};

/// CLI entry point.
pub fn run() -> anyhow::Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    commands::execute(commands::Cli::parse())
}
