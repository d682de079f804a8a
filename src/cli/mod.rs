//! CLI module for clasificar
//!
//! This module wires the parsed arguments into the training job.

mod logging;
mod train;

pub use logging::{log, LogLevel};
pub use train::run_job;

// Re-export Cli from config for convenience
pub use crate::config::Cli;
