//! The scoring path.
//!
//! - `adapter`: the loaded classifier as shared read-only state
//! - `calibration`: linear rescaling of raw probabilities
//! - `policy`: threshold decision
//! - `service`: orchestration of validator, model, calibration, policy and labels

pub mod adapter;
pub mod calibration;
pub mod policy;
pub mod service;

pub use adapter::*;
pub use calibration::*;
pub use policy::*;
pub use service::*;
