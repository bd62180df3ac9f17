//! Classifier implementations.
//!
//! Models are opaque to the scoring path: it only calls
//! `Classifier::predict_proba`. Concrete models live behind that trait so a
//! new model family only needs a new artifact variant.

pub mod forest;
pub mod logistic;
pub mod model;

pub use forest::*;
pub use logistic::*;
pub use model::*;
