//! Classifier contract and artifact loading.
//!
//! The scoring path only needs one primitive: the probability of the
//! positive (default) class for a feature vector. Anything that can provide
//! that implements `Classifier`.
//!
//! Trained models are shipped as a JSON artifact whose `kind` field selects
//! the concrete model.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::FeatureVector;
use crate::error::ModelError;
use crate::models::{ForestModel, LogisticModel};

/// A frozen probabilistic classifier.
///
/// Implementations must not mutate shared state in `predict_proba`; the same
/// instance is called concurrently from many requests.
pub trait Classifier: Send + Sync {
    /// Probability of the positive class, expected in [0, 1].
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, ModelError>;

    fn name(&self) -> &str;
}

/// On-disk model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelArtifact {
    Forest(ForestModel),
    Logistic(LogisticModel),
}

impl ModelArtifact {
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            ModelArtifact::Forest(m) => m.validate(),
            ModelArtifact::Logistic(m) => m.validate(),
        }
    }

    pub fn into_classifier(self) -> Box<dyn Classifier> {
        match self {
            ModelArtifact::Forest(m) => Box::new(m),
            ModelArtifact::Logistic(m) => Box::new(m),
        }
    }
}

/// Parse and validate an artifact from a JSON string.
pub fn parse_model(json: &str) -> Result<Box<dyn Classifier>, ModelError> {
    let artifact: ModelArtifact = serde_json::from_str(json)?;
    artifact.validate()?;
    Ok(artifact.into_classifier())
}

/// Read, parse and validate a model artifact file.
pub fn load_model(path: &Path) -> Result<Box<dyn Classifier>, ModelError> {
    let file = File::open(path).map_err(|source| ModelError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file))?;
    artifact.validate()?;
    Ok(artifact.into_classifier())
}
