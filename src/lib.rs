//! `credit-risk` library crate.
//!
//! The binary (`risk`) is a thin wrapper around this library so that:
//!
//! - the scoring path is testable without spawning processes
//! - a transport layer (HTTP, queue consumer, ...) can embed `ScoringService` directly
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod codebook;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod models;
pub mod report;
pub mod scoring;
