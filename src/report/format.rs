//! Formatted terminal output for batch runs.
//!
//! Formatting lives here so the scoring code stays free of presentation and
//! output changes stay localized.

use chrono::Local;

use crate::domain::{RiskAssessment, ScoringConfig};
use crate::error::ScoringError;
use crate::report::BatchSummary;

/// Format the run header and aggregate counts.
pub fn format_batch_summary(
    source: &str,
    model: Option<&str>,
    summary: &BatchSummary,
    config: &ScoringConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== risk - Loan Default Risk Assessment ===\n");
    out.push_str(&format!("Generated: {}\n", Local::now().format("%Y-%m-%d %H:%M:%S")));
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!("Model: {}\n", model.unwrap_or("unavailable")));
    out.push_str(&format!(
        "Calibration: [{:.3}, {:.3}] -> [0, 1] | threshold={:.3}\n",
        config.calibration.known_min, config.calibration.known_max, config.threshold
    ));

    out.push_str(&format!(
        "\nApplications: n={} | approved={} | denied={} | rejected={} | failed={}\n",
        summary.total, summary.approved, summary.denied, summary.rejected, summary.failed
    ));
    match (summary.approval_rate(), summary.mean_score) {
        (Some(rate), Some(mean)) => {
            out.push_str(&format!(
                "Approval rate: {:.1}% | mean risk score: {:.4}\n",
                rate * 100.0,
                mean
            ));
        }
        _ => out.push_str("Approval rate: - | mean risk score: -\n"),
    }
    out.push_str(&format!(
        "Score bands: low (<0.3)={} | elevated (<0.6)={} | high={}\n",
        summary.band_low, summary.band_elevated, summary.band_high
    ));

    out
}

/// Format the riskiest applications as a table.
///
/// `ids[i]` labels `results[i]`; `order` lists the indices to print.
pub fn format_riskiest(
    ids: &[String],
    results: &[Result<RiskAssessment, ScoringError>],
    order: &[usize],
) -> String {
    let mut out = String::new();
    out.push_str("Riskiest applications:\n");

    if order.is_empty() {
        out.push_str("(none scored)\n");
        return out;
    }

    out.push_str(&format!(
        "{:<14} {:>8} {:<9} {:<10} {:>5}  {}\n",
        "id", "score", "decision", "class", "age", "job"
    ));
    for &idx in order {
        let Some(Ok(a)) = results.get(idx) else {
            continue;
        };
        let id = ids.get(idx).map(String::as_str).unwrap_or("-");
        out.push_str(&format!(
            "{:<14} {:>8.4} {:<9} {:<10} {:>5.0}  {}\n",
            truncate(id, 14),
            a.risk_probability,
            a.decision.as_str(),
            a.risk_class.label(),
            a.applicant_profile.age,
            a.applicant_profile.job_type
        ));
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
        t.push('~');
        t
    }
}
