use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::models::{Question, RawQuestion};
use crate::outline::OutlineNode;
use crate::segmentation::{self, ChainConfig};
use crate::settings::{load_config, save_config};
use crate::stats::timeline_stats;
use crate::log_info;

const ENABLE_LOGS: bool = true;

#[derive(Debug, Parser)]
#[command(name = "questionchain")]
#[command(about = "Group classroom questions into chains and summarize each chain")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Segment questions into chains and write the report.
    Chains {
        /// JSON array of question records
        #[arg(long)]
        input: PathBuf,

        /// Lesson outline JSON; switches to one chain per teaching phase
        #[arg(long)]
        outline: Option<PathBuf>,

        /// Segmentation config JSON
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print pacing statistics for the question timeline.
    Stats {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write the default segmentation config.
    Config {
        #[arg(long)]
        output: PathBuf,
    },
}

pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Chains {
            input,
            outline,
            config,
            output,
        } => run_chains(&input, outline.as_deref(), config.as_deref(), output.as_deref()),
        Command::Stats {
            input,
            config,
            output,
        } => {
            let config = resolve_config(config.as_deref())?;
            let questions = load_questions(&input)?;
            let stats = timeline_stats(&questions, &config.weights)?;
            write_json(&stats, output.as_deref())
        }
        Command::Config { output } => {
            save_config(&output, &ChainConfig::default())?;
            log_info!("Wrote default config to {}", output.display());
            Ok(())
        }
    }
}

fn run_chains(
    input: &Path,
    outline: Option<&Path>,
    config: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let config = resolve_config(config)?;
    let questions = load_questions(input)?;

    let report = match outline {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read outline {}", path.display()))?;
            let root: OutlineNode = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse outline {}", path.display()))?;
            segmentation::build_outline_report(questions, &root, &config)?
        }
        None => segmentation::build_report(questions, &config)?,
    };

    log_info!(
        "{} questions -> {} chains",
        report.metadata.total_questions,
        report.metadata.total_chains
    );
    write_json(&report, output)
}

fn resolve_config(path: Option<&Path>) -> Result<ChainConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(ChainConfig::default()),
    }
}

fn load_questions(path: &Path) -> Result<Vec<Question>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read questions from {}", path.display()))?;
    let raw: Vec<RawQuestion> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse questions in {}", path.display()))?;
    log_info!("Read {} question records from {}", raw.len(), path.display());
    Ok(segmentation::ingest(raw))
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let serialized = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => fs::write(path, serialized)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{serialized}");
            Ok(())
        }
    }
}
