//! Classifier adapter: the loaded model as process-wide read-only state.
//!
//! The model is loaded once, before any request, and never replaced. A failed
//! load does not abort the process; the handle stays `Unavailable` and every
//! scoring call reports that.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::FeatureVector;
use crate::error::ScoringError;
use crate::models::{Classifier, load_model};

#[derive(Clone)]
pub enum ModelHandle {
    Ready(Arc<dyn Classifier>),
    Unavailable { reason: String },
}

impl ModelHandle {
    /// Load the artifact at `path`, degrading to `Unavailable` on any failure.
    pub fn load(path: &Path) -> Self {
        match load_model(path) {
            Ok(model) => {
                info!(model = model.name(), path = %path.display(), "classifier loaded");
                ModelHandle::Ready(Arc::from(model))
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "classifier unavailable; scoring requests will fail");
                ModelHandle::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn from_classifier(model: impl Classifier + 'static) -> Self {
        ModelHandle::Ready(Arc::new(model))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        ModelHandle::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelHandle::Ready(_))
    }

    pub fn model_name(&self) -> Option<&str> {
        match self {
            ModelHandle::Ready(model) => Some(model.name()),
            ModelHandle::Unavailable { .. } => None,
        }
    }

    /// Raw positive-class probability for `features`.
    ///
    /// Classifier errors, panics and probabilities outside [0, 1] all come
    /// back as `ScoringError::Unexpected`.
    pub fn score(&self, features: &FeatureVector) -> Result<f64, ScoringError> {
        let model = match self {
            ModelHandle::Ready(model) => model,
            ModelHandle::Unavailable { reason } => {
                return Err(ScoringError::ModelUnavailable {
                    reason: reason.clone(),
                });
            }
        };

        let raw = catch_unwind(AssertUnwindSafe(|| model.predict_proba(features)))
            .map_err(|_| ScoringError::unexpected(format!("classifier '{}' panicked", model.name())))?
            .map_err(|e| ScoringError::unexpected(e.to_string()))?;

        if !(raw.is_finite() && (0.0..=1.0).contains(&raw)) {
            return Err(ScoringError::unexpected(format!(
                "classifier '{}' returned probability {raw} outside [0, 1]",
                model.name()
            )));
        }
        Ok(raw)
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelHandle::Ready(model) => f.debug_tuple("Ready").field(&model.name()).finish(),
            ModelHandle::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    struct Fixed(f64);

    impl Classifier for Fixed {
        fn predict_proba(&self, _features: &FeatureVector) -> Result<f64, ModelError> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct Panics;

    impl Classifier for Panics {
        fn predict_proba(&self, _features: &FeatureVector) -> Result<f64, ModelError> {
            panic!("boom")
        }

        fn name(&self) -> &str {
            "panics"
        }
    }

    fn features() -> FeatureVector {
        FeatureVector([24.0, 5000.0, 30.0, 1.0, 0.0, 0.0, 5.0])
    }

    #[test]
    fn ready_handle_passes_probability_through() {
        let handle = ModelHandle::from_classifier(Fixed(0.21));
        assert!(handle.is_ready());
        assert_eq!(handle.score(&features()).unwrap(), 0.21);
    }

    #[test]
    fn unavailable_handle_refuses() {
        let handle = ModelHandle::unavailable("artifact missing");
        assert!(matches!(
            handle.score(&features()),
            Err(ScoringError::ModelUnavailable { .. })
        ));
    }

    #[test]
    fn missing_artifact_degrades_instead_of_failing() {
        let handle = ModelHandle::load(Path::new("/no/such/credit_risk_model.json"));
        assert!(!handle.is_ready());
        assert!(handle.model_name().is_none());
    }

    #[test]
    fn out_of_range_probability_is_unexpected() {
        for bad in [1.5, -0.1, f64::NAN] {
            let handle = ModelHandle::from_classifier(Fixed(bad));
            assert!(matches!(
                handle.score(&features()),
                Err(ScoringError::Unexpected { .. })
            ));
        }
    }

    #[test]
    fn panicking_classifier_is_contained() {
        let handle = ModelHandle::from_classifier(Panics);
        assert!(matches!(
            handle.score(&features()),
            Err(ScoringError::Unexpected { .. })
        ));
    }
}
