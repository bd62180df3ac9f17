//! Threshold decision policy.
//!
//! One comparison (`score > threshold`) produces the decision; the risk class
//! is derived from the decision. A score equal to the threshold approves.

use crate::domain::{Decision, RiskClass};

/// Decision plus the matching risk class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub decision: Decision,
    pub risk_class: RiskClass,
}

pub fn decide(calibrated_score: f64, threshold: f64) -> Verdict {
    let decision = if calibrated_score > threshold {
        Decision::Deny
    } else {
        Decision::Approve
    };
    Verdict {
        decision,
        risk_class: decision.risk_class(),
    }
}
