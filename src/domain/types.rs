//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - built by the payload validator and CSV ingest
//! - handed to the classifier as a fixed-order feature vector
//! - returned to callers as JSON or exported to CSV

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Column order the classifier was trained on.
pub const FEATURE_NAMES: [&str; 7] = [
    "duration",
    "credit_amount",
    "age",
    "job",
    "checking_status",
    "savings_status",
    "purpose",
];

/// Number of model inputs.
pub const N_FEATURES: usize = FEATURE_NAMES.len();

/// A validated loan application.
///
/// Categorical codes are kept as raw integers; they are not range-checked
/// against the Code Book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    /// Loan duration in months.
    pub duration: f64,
    /// Total credit requested (currency units).
    pub credit_amount: f64,
    /// Applicant age in years.
    pub age: f64,
    pub job: i64,
    pub checking_status: i64,
    pub savings_status: i64,
    pub purpose: i64,
}

impl LoanApplication {
    pub fn features(&self) -> FeatureVector {
        FeatureVector([
            self.duration,
            self.credit_amount,
            self.age,
            self.job as f64,
            self.checking_status as f64,
            self.savings_status as f64,
            self.purpose as f64,
        ])
    }
}

/// Model input in `FEATURE_NAMES` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; N_FEATURES]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }
}

/// Categorical dimensions that have display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CodeDimension {
    Job,
    CheckingStatus,
    SavingsStatus,
    Purpose,
}

impl CodeDimension {
    pub const ALL: [CodeDimension; 4] = [
        CodeDimension::Job,
        CodeDimension::CheckingStatus,
        CodeDimension::SavingsStatus,
        CodeDimension::Purpose,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Approve,
    Deny,
}

impl Decision {
    /// The risk class is a function of the decision, so the two cannot disagree.
    pub fn risk_class(self) -> RiskClass {
        match self {
            Decision::Approve => RiskClass::Low,
            Decision::Deny => RiskClass::High,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Approve => "APPROVE",
            Decision::Deny => "DENY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskClass {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskClass {
    pub fn label(self) -> &'static str {
        match self {
            RiskClass::Low => "Low Risk",
            RiskClass::High => "High Risk",
        }
    }
}

/// Display fields echoed back with a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub job_type: String,
    pub age: f64,
}

/// Result of a successful assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub decision: Decision,
    /// Calibrated score rounded to 4 decimal places.
    pub risk_probability: f64,
    pub risk_class: RiskClass,
    pub applicant_profile: ApplicantProfile,
}

/// Linear rescaling window for raw classifier output.
///
/// `known_min`/`known_max` bracket where the classifier's raw probabilities
/// typically fall; scores inside the window are stretched onto [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRange {
    pub known_min: f64,
    pub known_max: f64,
}

impl Default for CalibrationRange {
    fn default() -> Self {
        Self {
            known_min: 0.0,
            known_max: 0.7,
        }
    }
}

/// Numeric configuration of the scoring path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub calibration: CalibrationRange,
    /// Calibrated scores strictly above this are denied.
    pub threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            calibration: CalibrationRange::default(),
            threshold: 0.5,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        let CalibrationRange { known_min, known_max } = self.calibration;
        if !(known_min.is_finite() && known_max.is_finite()) {
            return Err(AppError::new(2, "Calibration bounds must be finite."));
        }
        if known_max <= known_min {
            return Err(AppError::new(
                2,
                format!("Calibration range is empty: known_max ({known_max}) must exceed known_min ({known_min})."),
            ));
        }
        if !(self.threshold.is_finite() && (0.0..=1.0).contains(&self.threshold)) {
            return Err(AppError::new(2, "Decision threshold must lie in [0, 1]."));
        }
        Ok(())
    }
}
