//! Command-line parsing for the loan risk scorer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the scoring code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::CodeDimension;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "risk", version, about = "Loan default risk assessment")]
pub struct Cli {
    #[command(flatten)]
    pub scoring: ScoringArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Assess one application given as JSON and print the result as JSON.
    ///
    /// Reads from `--payload`, `--json`, or stdin when neither is given.
    Score(ScoreArgs),
    /// Assess every row of a CSV file and print a summary.
    Batch(BatchArgs),
    /// Assess synthetic applications (useful for smoke runs).
    Sample(SampleArgs),
    /// Print the category code reference as JSON.
    Codebook(CodebookArgs),
}

/// Options shared by every command.
#[derive(Debug, Args, Clone)]
pub struct ScoringArgs {
    /// Model artifact (JSON). Falls back to `CREDIT_RISK_MODEL` (also read from `.env`),
    /// then `assets/credit_risk_model.json`.
    #[arg(long, global = true, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Lower end of the raw probability window used for calibration.
    #[arg(long, global = true, default_value_t = 0.0)]
    pub known_min: f64,

    /// Upper end of the raw probability window used for calibration.
    #[arg(long, global = true, default_value_t = 0.7)]
    pub known_max: f64,

    /// Calibrated scores above this are denied.
    #[arg(long, global = true, default_value_t = 0.5)]
    pub threshold: f64,

    /// Log level when `RUST_LOG` is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// File holding the JSON payload.
    #[arg(long, value_name = "JSON", conflicts_with = "json")]
    pub payload: Option<PathBuf>,

    /// Inline JSON payload.
    #[arg(long)]
    pub json: Option<String>,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// CSV with columns duration, credit_amount, age, job, checking_status, savings_status, purpose (and optional id).
    #[arg(long, value_name = "CSV")]
    pub csv: PathBuf,

    /// Export per-row results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Show the top-N riskiest applications.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

#[derive(Debug, Args)]
pub struct SampleArgs {
    /// Number of synthetic applications.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub count: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Export per-row results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Show the top-N riskiest applications.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

#[derive(Debug, Args)]
pub struct CodebookArgs {
    /// Print only this dimension's table.
    #[arg(long, value_enum)]
    pub dimension: Option<CodeDimension>,
}
