//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - loads the model once and builds the scoring service
//! - dispatches to the requested command
//! - prints JSON / reports and writes optional exports

use std::io::{Read, Write};
use std::path::Path;

use clap::Parser;
use tracing::info;

use crate::cli::{BatchArgs, CodebookArgs, Command, SampleArgs, ScoreArgs};
use crate::data::{SampleConfig, generate_applications};
use crate::domain::CodeDimension;
use crate::error::{AppError, ScoringError};
use crate::io::{ScoredRow, load_applications, parse_payload, write_results_csv};
use crate::scoring::ScoringService;

pub mod pipeline;

/// Entry point for the `risk` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    crate::logging::init(&cli.scoring.log_level);

    let service = pipeline::build_service(&cli.scoring)?;

    match cli.command {
        Command::Score(args) => handle_score(&service, args),
        Command::Batch(args) => handle_batch(&service, args),
        Command::Sample(args) => handle_sample(&service, args),
        Command::Codebook(args) => handle_codebook(&service, args),
    }
}

fn handle_score(service: &ScoringService, args: ScoreArgs) -> Result<(), AppError> {
    let raw = match (&args.payload, args.json) {
        (Some(path), _) => std::fs::read_to_string(path)
            .map_err(|e| AppError::new(2, format!("Failed to read payload '{}': {e}", path.display())))?,
        (None, Some(json)) => json,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| AppError::new(2, format!("Failed to read payload from stdin: {e}")))?;
            buf
        }
    };

    score_payload(service, &raw, &mut std::io::stdout().lock())
}

/// Assess one raw body and write the assessment or the `ErrorResponse` as JSON.
///
/// Every failure, malformed JSON included, produces a JSON body on `out`.
pub fn score_payload(service: &ScoringService, raw: &str, out: &mut impl Write) -> Result<(), AppError> {
    let result = parse_payload(raw)
        .map_err(ScoringError::from)
        .and_then(|payload| service.assess(&payload));

    match result {
        Ok(assessment) => {
            write_json(out, &assessment)?;
            Ok(())
        }
        Err(err) => {
            write_json(out, &err.to_response())?;
            Err(err.into())
        }
    }
}

fn handle_batch(service: &ScoringService, args: BatchArgs) -> Result<(), AppError> {
    let ingest = load_applications(&args.csv)?;
    for e in &ingest.row_errors {
        tracing::warn!(line = e.line, "{}", e.message);
    }

    let ids = ingest.rows.iter().map(|r| r.id.clone()).collect();
    let run = pipeline::run_batch(service, ids, &ingest.payloads(), args.top);
    info!(rows = ingest.rows_read, scored = run.summary.approved + run.summary.denied, "batch complete");

    print_batch(service, &args.csv.display().to_string(), &run);
    export(args.export.as_deref(), &run)
}

fn handle_sample(service: &ScoringService, args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        count: args.count,
        seed: args.seed,
    };
    let applications = generate_applications(&config, service.codebook())?;

    let mut payloads = Vec::with_capacity(applications.len());
    for app in &applications {
        payloads.push(
            serde_json::to_value(app).map_err(|e| AppError::new(4, format!("Failed to encode sample: {e}")))?,
        );
    }
    let ids = (1..=applications.len()).map(|i| format!("SAMPLE-{i:04}")).collect();
    let run = pipeline::run_batch(service, ids, &payloads, args.top);

    print_batch(service, &format!("synthetic (n={}, seed={})", args.count, args.seed), &run);
    export(args.export.as_deref(), &run)
}

fn handle_codebook(service: &ScoringService, args: CodebookArgs) -> Result<(), AppError> {
    write_codebook(service, args.dimension, &mut std::io::stdout().lock())
}

pub fn write_codebook(
    service: &ScoringService,
    dimension: Option<CodeDimension>,
    out: &mut impl Write,
) -> Result<(), AppError> {
    match dimension {
        Some(dim) => write_json(out, &service.codebook().table(dim)),
        None => write_json(out, &service.reference_codes()),
    }
}

fn print_batch(service: &ScoringService, source: &str, run: &pipeline::BatchOutput) {
    println!(
        "{}",
        crate::report::format_batch_summary(source, service.model().model_name(), &run.summary, service.config())
    );
    println!(
        "{}",
        crate::report::format_riskiest(&run.ids, &run.results, &run.riskiest)
    );
}

fn export(path: Option<&Path>, run: &pipeline::BatchOutput) -> Result<(), AppError> {
    let Some(path) = path else {
        return Ok(());
    };
    let rows: Vec<ScoredRow<'_>> = run
        .ids
        .iter()
        .zip(&run.results)
        .map(|(id, result)| ScoredRow { id, result })
        .collect();
    write_results_csv(path, &rows)?;
    info!(path = %path.display(), rows = rows.len(), "exported results");
    Ok(())
}

fn write_json<T: serde::Serialize>(out: &mut impl Write, value: &T) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *out, value)
        .map_err(|e| AppError::new(4, format!("Failed to encode JSON: {e}")))?;
    writeln!(out).map_err(|e| AppError::new(4, format!("Failed to write output: {e}")))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::codebook::CodeBook;
    use crate::domain::{FeatureVector, ScoringConfig};
    use crate::error::ModelError;
    use crate::io::PAYLOAD_FIELD;
    use crate::models::Classifier;
    use crate::scoring::ModelHandle;

    struct Fixed(f64);

    impl Classifier for Fixed {
        fn predict_proba(&self, _features: &FeatureVector) -> Result<f64, ModelError> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn service(model: ModelHandle) -> ScoringService {
        ScoringService::new(ScoringConfig::default(), CodeBook::standard(), model).unwrap()
    }

    fn score(service: &ScoringService, raw: &str) -> (Result<(), AppError>, Value) {
        let mut out = Vec::new();
        let result = score_payload(service, raw, &mut out);
        let body = serde_json::from_slice(&out).unwrap();
        (result, body)
    }

    const PAYLOAD: &str = r#"{"duration": 24, "credit_amount": 5000, "age": 30,
        "job": 1, "checking_status": 1, "savings_status": 0, "purpose": 5}"#;

    #[test]
    fn scored_payload_prints_assessment() {
        let (result, body) = score(&service(ModelHandle::from_classifier(Fixed(0.14))), PAYLOAD);
        assert!(result.is_ok());
        assert_eq!(body["decision"], json!("APPROVE"));
        assert_eq!(body["risk_probability"], json!(0.2));
    }

    #[test]
    fn malformed_json_prints_validation_error_body() {
        let (result, body) = score(&service(ModelHandle::from_classifier(Fixed(0.14))), "{bad");
        assert_eq!(result.unwrap_err().exit_code(), 2);
        assert_eq!(body["error"], json!("validation_error"));
        assert_eq!(body["fields"], json!([PAYLOAD_FIELD]));
    }

    #[test]
    fn incomplete_payload_prints_every_missing_field() {
        let (result, body) = score(&service(ModelHandle::from_classifier(Fixed(0.14))), r#"{"duration": 24}"#);
        assert_eq!(result.unwrap_err().exit_code(), 2);
        assert_eq!(body["error"], json!("validation_error"));
        assert_eq!(body["fields"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn missing_model_prints_unavailable_body() {
        let (result, body) = score(&service(ModelHandle::unavailable("no artifact")), PAYLOAD);
        assert_eq!(result.unwrap_err().exit_code(), 3);
        assert_eq!(body["error"], json!("model_unavailable"));
        assert_eq!(body["message"], json!("Model not loaded"));
    }

    #[test]
    fn codebook_prints_reference_codes_or_one_table() {
        let service = service(ModelHandle::from_classifier(Fixed(0.1)));

        let mut out = Vec::new();
        write_codebook(&service, None, &mut out).unwrap();
        let body: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(body["status"], json!("online"));
        assert_eq!(body["reference_codes"]["job"]["1"], json!("Skilled Employee"));

        let mut out = Vec::new();
        write_codebook(&service, Some(CodeDimension::Purpose), &mut out).unwrap();
        let body: Value = serde_json::from_slice(&out).unwrap();
        assert!(body.get("job").is_none());
        assert!(!body.as_object().unwrap().is_empty());
    }
}
