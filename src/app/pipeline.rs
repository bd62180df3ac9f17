//! Shared startup and batch logic used by every command.
//!
//! Startup is one explicit step: resolve configuration, load the model once,
//! and hand back an immutable `ScoringService`. Commands only borrow it.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::cli::ScoringArgs;
use crate::codebook::CodeBook;
use crate::domain::{CalibrationRange, RiskAssessment, ScoringConfig};
use crate::error::{AppError, ScoringError};
use crate::report::{BatchSummary, riskiest, summarize};
use crate::scoring::{ModelHandle, ScoringService};

/// Environment variable consulted when `--model` is not given.
pub const MODEL_ENV: &str = "CREDIT_RISK_MODEL";
/// Bundled artifact, relative to the repository root.
pub const DEFAULT_MODEL_PATH: &str = "assets/credit_risk_model.json";

pub fn scoring_config_from_args(args: &ScoringArgs) -> ScoringConfig {
    ScoringConfig {
        calibration: CalibrationRange {
            known_min: args.known_min,
            known_max: args.known_max,
        },
        threshold: args.threshold,
    }
}

/// `--model`, else `CREDIT_RISK_MODEL` (a `.env` file is honored), else the default.
pub fn resolve_model_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    dotenvy::dotenv().ok();
    std::env::var_os(MODEL_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH))
}

/// Build the service. A missing or broken model is not an error here.
pub fn build_service(args: &ScoringArgs) -> Result<ScoringService, AppError> {
    let config = scoring_config_from_args(args);
    let model = ModelHandle::load(&resolve_model_path(args.model.as_deref()));
    ScoringService::new(config, CodeBook::standard(), model)
}

/// All computed outputs of one batch run.
#[derive(Debug)]
pub struct BatchOutput {
    pub ids: Vec<String>,
    pub results: Vec<Result<RiskAssessment, ScoringError>>,
    pub summary: BatchSummary,
    pub riskiest: Vec<usize>,
}

pub fn run_batch(service: &ScoringService, ids: Vec<String>, payloads: &[Value], top_n: usize) -> BatchOutput {
    let results = service.assess_batch(payloads);
    let summary = summarize(&results);
    let riskiest = riskiest(&results, top_n);
    BatchOutput {
        ids,
        results,
        summary,
        riskiest,
    }
}
