//! Scoring service: validate -> infer -> calibrate -> decide -> annotate.
//!
//! The service owns only immutable state (configuration, Code Book, model
//! handle), so one instance can be shared across threads and called
//! concurrently without locking.

use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::codebook::CodeBook;
use crate::domain::{ApplicantProfile, CodeDimension, LoanApplication, RiskAssessment, ScoringConfig};
use crate::error::{AppError, ScoringError};
use crate::io::validate_payload;
use crate::scoring::{ModelHandle, decide};

/// Body of the read-only reference endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceCodes<'a> {
    pub status: &'static str,
    pub reference_codes: &'a CodeBook,
}

#[derive(Debug)]
pub struct ScoringService {
    config: ScoringConfig,
    codebook: CodeBook,
    model: ModelHandle,
}

impl ScoringService {
    /// Build a service; rejects invalid calibration/threshold settings.
    pub fn new(config: ScoringConfig, codebook: CodeBook, model: ModelHandle) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self {
            config,
            codebook,
            model,
        })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn codebook(&self) -> &CodeBook {
        &self.codebook
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    /// Assess a raw request payload.
    pub fn assess(&self, payload: &Value) -> Result<RiskAssessment, ScoringError> {
        let application = validate_payload(payload).map_err(|err| {
            warn!(fields = ?err.field_names(), "rejected loan application payload");
            ScoringError::Validation(err)
        })?;
        self.assess_application(&application)
    }

    /// Assess an already-validated application.
    pub fn assess_application(&self, application: &LoanApplication) -> Result<RiskAssessment, ScoringError> {
        let result = self.score(application);
        if let Err(ScoringError::Unexpected { cause }) = &result {
            error!(%cause, "unexpected failure while scoring");
        }
        result
    }

    /// Assess many payloads in parallel; results keep input order.
    pub fn assess_batch(&self, payloads: &[Value]) -> Vec<Result<RiskAssessment, ScoringError>> {
        payloads.par_iter().map(|p| self.assess(p)).collect()
    }

    pub fn reference_codes(&self) -> ReferenceCodes<'_> {
        ReferenceCodes {
            status: if self.model.is_ready() {
                "online"
            } else {
                "model_unavailable"
            },
            reference_codes: &self.codebook,
        }
    }

    fn score(&self, application: &LoanApplication) -> Result<RiskAssessment, ScoringError> {
        let raw = self.model.score(&application.features())?;

        let calibrated = self.config.calibration.calibrate(raw);
        if !calibrated.is_finite() {
            return Err(ScoringError::unexpected(format!(
                "calibration of raw probability {raw} produced {calibrated}"
            )));
        }

        // Decide on the unrounded score; rounding is for display only.
        let verdict = decide(calibrated, self.config.threshold);

        debug!(
            raw,
            calibrated,
            decision = verdict.decision.as_str(),
            "assessed loan application"
        );

        Ok(RiskAssessment {
            decision: verdict.decision,
            risk_probability: round_to(calibrated, 4),
            risk_class: verdict.risk_class,
            applicant_profile: ApplicantProfile {
                job_type: self.codebook.label(CodeDimension::Job, application.job).to_string(),
                age: application.age,
            },
        })
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::codebook::UNKNOWN_LABEL;
    use crate::domain::{Decision, FeatureVector, RiskClass};
    use crate::error::{ErrorKind, ModelError};
    use crate::models::Classifier;

    /// Returns a fixed probability and counts calls.
    struct Stub {
        p: f64,
        calls: Arc<AtomicUsize>,
    }

    impl Classifier for Stub {
        fn predict_proba(&self, _features: &FeatureVector) -> Result<f64, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.p)
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct Failing;

    impl Classifier for Failing {
        fn predict_proba(&self, _features: &FeatureVector) -> Result<f64, ModelError> {
            Err(ModelError::Inference("tree walk failed".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    /// Probability grows with loan duration.
    struct ByDuration;

    impl Classifier for ByDuration {
        fn predict_proba(&self, features: &FeatureVector) -> Result<f64, ModelError> {
            Ok((features.0[0] / 100.0).min(1.0))
        }

        fn name(&self) -> &str {
            "by-duration"
        }
    }

    fn service_with(p: f64) -> (ScoringService, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let stub = Stub {
            p,
            calls: Arc::clone(&calls),
        };
        let service = ScoringService::new(
            ScoringConfig::default(),
            CodeBook::standard(),
            ModelHandle::from_classifier(stub),
        )
        .unwrap();
        (service, calls)
    }

    fn payload() -> Value {
        json!({
            "duration": 24,
            "credit_amount": 5000,
            "age": 30,
            "job": 1,
            "checking_status": 0,
            "savings_status": 0,
            "purpose": 5
        })
    }

    #[test]
    fn low_raw_probability_approves() {
        let (service, calls) = service_with(0.21);
        let out = service.assess(&payload()).unwrap();
        assert_eq!(out.decision, Decision::Approve);
        assert_eq!(out.risk_class, RiskClass::Low);
        assert_eq!(out.risk_probability, 0.3);
        assert_eq!(out.applicant_profile.job_type, "Skilled Employee");
        assert_eq!(out.applicant_profile.age, 30.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn high_raw_probability_denies() {
        let (service, _) = service_with(0.6);
        let out = service.assess(&payload()).unwrap();
        assert_eq!(out.decision, Decision::Deny);
        assert_eq!(out.risk_class, RiskClass::High);
        assert_eq!(out.risk_probability, 0.8571);
    }

    #[test]
    fn missing_age_never_reaches_classifier() {
        let (service, calls) = service_with(0.21);
        let mut p = payload();
        p.as_object_mut().unwrap().remove("age");
        match service.assess(&p) {
            Err(ScoringError::Validation(err)) => assert!(err.names("age")),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn absent_model_fails_every_call() {
        let service = ScoringService::new(
            ScoringConfig::default(),
            CodeBook::standard(),
            ModelHandle::load(std::path::Path::new("/missing/credit_risk_model.json")),
        )
        .unwrap();
        for _ in 0..3 {
            let err = service.assess(&payload()).unwrap_err();
            assert!(matches!(err, ScoringError::ModelUnavailable { .. }));
            assert_eq!(err.to_response().error, ErrorKind::ModelUnavailable);
        }
        assert_eq!(service.reference_codes().status, "model_unavailable");
    }

    #[test]
    fn classifier_failure_is_generic() {
        let service = ScoringService::new(
            ScoringConfig::default(),
            CodeBook::standard(),
            ModelHandle::from_classifier(Failing),
        )
        .unwrap();
        let err = service.assess(&payload()).unwrap_err();
        let response = err.to_response();
        assert_eq!(response.error, ErrorKind::InternalError);
        assert!(!response.message.contains("tree walk"));
    }

    #[test]
    fn unknown_job_code_still_decides() {
        let (service, _) = service_with(0.21);
        let mut p = payload();
        p["job"] = json!(99);
        let out = service.assess(&p).unwrap();
        assert_eq!(out.applicant_profile.job_type, UNKNOWN_LABEL);
        assert_eq!(out.decision, Decision::Approve);
    }

    #[test]
    fn decision_uses_unrounded_score() {
        // 0.35003 / 0.7 = 0.50004..., displayed as 0.5 but above the threshold.
        let (service, _) = service_with(0.350_03);
        let out = service.assess(&payload()).unwrap();
        assert_eq!(out.risk_probability, 0.5);
        assert_eq!(out.decision, Decision::Deny);
    }

    #[test]
    fn raw_above_window_clips_to_one() {
        let (service, _) = service_with(0.95);
        let out = service.assess(&payload()).unwrap();
        assert_eq!(out.risk_probability, 1.0);
        assert_eq!(out.decision, Decision::Deny);
    }

    #[test]
    fn custom_config_moves_the_cutoff() {
        let config = ScoringConfig {
            threshold: 0.25,
            ..ScoringConfig::default()
        };
        let service = ScoringService::new(
            config,
            CodeBook::standard(),
            ModelHandle::from_classifier(Stub {
                p: 0.21,
                calls: Arc::new(AtomicUsize::new(0)),
            }),
        )
        .unwrap();
        assert_eq!(service.assess(&payload()).unwrap().decision, Decision::Deny);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = ScoringConfig::default();
        config.calibration.known_max = config.calibration.known_min;
        let result = ScoringService::new(config, CodeBook::standard(), ModelHandle::unavailable("unused"));
        assert!(result.is_err());
    }

    #[test]
    fn batch_keeps_input_order() {
        let service = ScoringService::new(
            ScoringConfig::default(),
            CodeBook::standard(),
            ModelHandle::from_classifier(ByDuration),
        )
        .unwrap();
        let payloads: Vec<Value> = (1..=60)
            .map(|d| {
                let mut p = payload();
                p["duration"] = json!(d);
                p
            })
            .collect();
        let results = service.assess_batch(&payloads);
        assert_eq!(results.len(), 60);
        for (idx, result) in results.iter().enumerate() {
            let expected = round_to(((idx + 1) as f64 / 100.0) / 0.7, 4);
            let got = result.as_ref().unwrap().risk_probability;
            assert!((got - expected).abs() < 1e-9, "row {idx}: {got} vs {expected}");
        }
    }

    #[test]
    fn concurrent_calls_share_one_model() {
        let (service, calls) = service_with(0.21);
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..25 {
                        let out = service.assess(&payload()).unwrap();
                        assert_eq!(out.risk_probability, 0.3);
                    }
                });
            }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 200);
    }

    #[test]
    fn response_json_shape() {
        let (service, _) = service_with(0.21);
        let json = serde_json::to_value(service.assess(&payload()).unwrap()).unwrap();
        assert_eq!(json["decision"], "APPROVE");
        assert_eq!(json["risk_class"], "Low Risk");
        assert_eq!(json["risk_probability"], 0.3);
        assert_eq!(json["applicant_profile"]["job_type"], "Skilled Employee");
        assert_eq!(json["applicant_profile"]["age"], 30.0);
    }

    #[test]
    fn reference_codes_report_online() {
        let (service, _) = service_with(0.21);
        let json = serde_json::to_value(service.reference_codes()).unwrap();
        assert_eq!(json["status"], "online");
        assert_eq!(json["reference_codes"]["job"]["1"], "Skilled Employee");
    }
}
