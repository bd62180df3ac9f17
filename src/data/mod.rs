//! Input data sources other than live requests.

pub mod sample;

pub use sample::*;
