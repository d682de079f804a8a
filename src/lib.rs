//! clasificar: single-job SVM training for tabular data.
//!
//! The job loads CSV data from object storage (or a warehouse table), coerces
//! declared numeric columns with mean imputation, fits a standardize -> SVM
//! pipeline under 10-fold cross-validation, and exports the fitted pipeline
//! plus a plain-text training report back to object storage.
//!
//! # Example
//!
//! ```no_run
//! use clap::Parser;
//! use clasificar::{cli::run_job, config::Cli};
//!
//! let cli = Cli::parse_from([
//!     "clasificar",
//!     "--training_data_uri", "gs://bucket/data/training-*.csv",
//!     "--validation_data_uri", "gs://bucket/data/validation-000.csv",
//!     "--test_data_uri", "gs://bucket/data/test-000.csv",
//!     "--model_dir", "gs://bucket/training-job",
//! ]);
//! run_job(&cli).unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod export;
pub mod model;
pub mod report;
pub mod storage;

use storage::object::ObjectError;
use storage::warehouse::WarehouseError;

/// Top-level job errors.
///
/// Input errors abort the run before any work is done; storage and warehouse
/// errors propagate from the backends; data errors surface only when recovery
/// by imputation is impossible.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input error: {0}")]
    Input(String),

    #[error("invalid storage uri: {0}")]
    Uri(String),

    #[error("uri scheme must be gs, got {got:?}")]
    Scheme { got: String },

    #[error("column not found: {0:?}")]
    ColumnNotFound(String),

    #[error("data error: {0}")]
    Data(String),

    #[error("storage error: {0}")]
    Storage(#[from] ObjectError),

    #[error("warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),

    #[error("training error: {0}")]
    Training(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for job operations.
pub type Result<T> = std::result::Result<T, Error>;
