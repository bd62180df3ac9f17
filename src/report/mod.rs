//! Reporting utilities: batch summaries and riskiest-applicant tables.

pub mod format;

pub use format::*;

use crate::domain::{Decision, RiskAssessment};
use crate::error::ScoringError;

/// Gauge bands used when presenting a calibrated score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Low,
    Elevated,
    High,
}

impl ScoreBand {
    pub fn of(score: f64) -> Self {
        if score < 0.3 {
            ScoreBand::Low
        } else if score < 0.6 {
            ScoreBand::Elevated
        } else {
            ScoreBand::High
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub approved: usize,
    pub denied: usize,
    /// Payloads that failed validation.
    pub rejected: usize,
    /// Model unavailable or internal failures.
    pub failed: usize,
    pub mean_score: Option<f64>,
    pub band_low: usize,
    pub band_elevated: usize,
    pub band_high: usize,
}

impl BatchSummary {
    pub fn approval_rate(&self) -> Option<f64> {
        let decided = self.approved + self.denied;
        (decided > 0).then(|| self.approved as f64 / decided as f64)
    }
}

pub fn summarize(results: &[Result<RiskAssessment, ScoringError>]) -> BatchSummary {
    let mut summary = BatchSummary {
        total: results.len(),
        ..BatchSummary::default()
    };
    let mut score_sum = 0.0;

    for result in results {
        match result {
            Ok(a) => {
                match a.decision {
                    Decision::Approve => summary.approved += 1,
                    Decision::Deny => summary.denied += 1,
                }
                match ScoreBand::of(a.risk_probability) {
                    ScoreBand::Low => summary.band_low += 1,
                    ScoreBand::Elevated => summary.band_elevated += 1,
                    ScoreBand::High => summary.band_high += 1,
                }
                score_sum += a.risk_probability;
            }
            Err(ScoringError::Validation(_)) => summary.rejected += 1,
            Err(_) => summary.failed += 1,
        }
    }

    let scored = summary.approved + summary.denied;
    if scored > 0 {
        summary.mean_score = Some(score_sum / scored as f64);
    }
    summary
}

/// Indices of the `top_n` highest-scoring successful results, riskiest first.
pub fn riskiest(results: &[Result<RiskAssessment, ScoringError>], top_n: usize) -> Vec<usize> {
    let mut scored: Vec<(usize, f64)> = results
        .iter()
        .enumerate()
        .filter_map(|(idx, r)| r.as_ref().ok().map(|a| (idx, a.risk_probability)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(top_n).map(|(idx, _)| idx).collect()
}
