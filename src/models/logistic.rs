//! Logistic regression over the raw feature vector.

use serde::{Deserialize, Serialize};

use crate::domain::{FeatureVector, N_FEATURES};
use crate::error::ModelError;
use crate::models::Classifier;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: [f64; N_FEATURES],
}

impl LogisticModel {
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::Invalid(
                "logistic parameters must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl Classifier for LogisticModel {
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.as_slice())
                .map(|(w, x)| w * x)
                .sum::<f64>();
        if z.is_nan() {
            return Err(ModelError::Inference("linear predictor is NaN".to_string()));
        }
        Ok(sigmoid(z))
    }

    fn name(&self) -> &str {
        "logistic"
    }
}

/// Logistic function without overflow for large |z|.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
