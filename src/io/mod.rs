//! Input/output helpers.
//!
//! - payload validation (`payload`)
//! - CSV ingest for batch scoring (`ingest`)
//! - result exports (`export`)

pub mod export;
pub mod ingest;
pub mod payload;

pub use export::*;
pub use ingest::*;
pub use payload::*;
