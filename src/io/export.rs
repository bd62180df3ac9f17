//! Export per-application results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.
//! Failed rows keep their id and carry the error message in the last column.

use std::io::Write;
use std::path::Path;

use crate::domain::RiskAssessment;
use crate::error::{AppError, ScoringError};

/// One scored row: caller-supplied id plus the outcome.
pub struct ScoredRow<'a> {
    pub id: &'a str,
    pub result: &'a Result<RiskAssessment, ScoringError>,
}

/// Write per-application results to a CSV file.
pub fn write_results_csv(path: &Path, rows: &[ScoredRow<'_>]) -> Result<(), AppError> {
    let file = std::fs::File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(file, rows)
}

pub fn write_results<W: Write>(out: W, rows: &[ScoredRow<'_>]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);

    writer
        .write_record(["id", "decision", "risk_probability", "risk_class", "job_type", "age", "error"])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for row in rows {
        let record = match row.result {
            Ok(a) => [
                row.id.to_string(),
                a.decision.as_str().to_string(),
                format!("{:.4}", a.risk_probability),
                a.risk_class.label().to_string(),
                a.applicant_profile.job_type.clone(),
                a.applicant_profile.age.to_string(),
                String::new(),
            ],
            Err(e) => [
                row.id.to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                e.to_response().message,
            ],
        };
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
