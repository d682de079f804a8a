//! Command-line interface for the training job.
//!
//! Every flag is optional; the managed training environment provides defaults
//! through `AIP_*` environment variables, which are used only when the
//! corresponding flag is absent.

use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

use crate::config::FeatureSchema;
use crate::model::{Kernel, SvcParams};
use crate::storage::{BackendConfig, GcsConfig, WarehouseConfig};

/// Source format behind the data URIs.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// CSV objects under `gs://` paths, wildcards supported.
    Csv,
    /// Warehouse tables referenced as `warehouse://project.dataset.table`.
    Warehouse,
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataFormat::Csv => f.write_str("csv"),
            DataFormat::Warehouse => f.write_str("warehouse"),
        }
    }
}

/// clasificar: tabular SVM training job
#[derive(Parser, Debug, Clone)]
#[command(name = "clasificar")]
#[command(version)]
#[command(
    about = "Trains an SVM classifier on tabular data and exports the fitted pipeline and a training report to object storage"
)]
pub struct Cli {
    /// SVC model parameter: kernel
    #[arg(long = "model_param_kernel", value_enum, default_value_t = Kernel::Linear)]
    pub model_param_kernel: Kernel,

    /// SVC model parameter: degree (only applies to the poly kernel)
    #[arg(long = "model_param_degree", default_value_t = 3)]
    pub model_param_degree: u32,

    /// SVC model parameter: C (regularization)
    #[arg(long = "model_param_C", default_value_t = 1.0)]
    pub model_param_c: f64,

    /// Whether to enable probability estimates
    #[arg(long = "model_param_probability", default_value_t = true, action = clap::ArgAction::Set)]
    pub model_param_probability: bool,

    /// Directory URI to output model and report artifacts
    #[arg(long = "model_dir", env = "AIP_MODEL_DIR", default_value = "")]
    pub model_dir: String,

    /// Format of the data URIs: csv for gs:// paths, warehouse for
    /// warehouse://project.dataset.table references
    #[arg(long = "data_format", value_enum, env = "AIP_DATA_FORMAT", default_value_t = DataFormat::Csv)]
    pub data_format: DataFormat,

    /// Location of training data
    #[arg(long = "training_data_uri", env = "AIP_TRAINING_DATA_URI", default_value = "")]
    pub training_data_uri: String,

    /// Location of validation data
    #[arg(long = "validation_data_uri", env = "AIP_VALIDATION_DATA_URI", default_value = "")]
    pub validation_data_uri: String,

    /// Location of test data
    #[arg(long = "test_data_uri", env = "AIP_TEST_DATA_URI", default_value = "")]
    pub test_data_uri: String,

    /// Comma-separated numeric feature column names
    #[arg(long = "numeric_features", value_delimiter = ',')]
    pub numeric_features: Option<Vec<String>>,

    /// Label column name
    #[arg(long = "label")]
    pub label: Option<String>,

    /// Root directory for the filesystem object-storage backend; without it
    /// gs:// buckets resolve to the mock GCS backend
    #[arg(long = "storage_root")]
    pub storage_root: Option<PathBuf>,

    /// SQLite database file backing the warehouse
    #[arg(long = "warehouse_db")]
    pub warehouse_db: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Classifier hyperparameters, passed through unmodified.
    pub fn svc_params(&self) -> SvcParams {
        SvcParams {
            kernel: self.model_param_kernel,
            degree: self.model_param_degree,
            c: self.model_param_c,
            probability: self.model_param_probability,
        }
    }

    /// Column roles, with flag overrides applied over the defaults.
    pub fn feature_schema(&self) -> FeatureSchema {
        FeatureSchema::resolve(self.numeric_features.clone(), self.label.clone())
    }

    /// Object-storage backend to serve gs:// URIs.
    pub fn backend_config(&self) -> BackendConfig {
        match &self.storage_root {
            Some(root) => BackendConfig::Local { root: root.clone() },
            None => BackendConfig::Gcs(GcsConfig::default()),
        }
    }

    /// Warehouse backend to serve warehouse:// table references.
    pub fn warehouse_config(&self) -> WarehouseConfig {
        match &self.warehouse_db {
            Some(path) => WarehouseConfig::Sqlite { path: path.clone() },
            None => WarehouseConfig::Memory,
        }
    }
}
