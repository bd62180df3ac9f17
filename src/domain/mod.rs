//! Domain types used throughout the scoring path.
//!
//! This module defines:
//!
//! - the validated input (`LoanApplication`) and its model view (`FeatureVector`)
//! - outcomes (`Decision`, `RiskClass`, `RiskAssessment`)
//! - numeric configuration (`ScoringConfig`, `CalibrationRange`)

pub mod types;

pub use types::*;
