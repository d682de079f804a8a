//! clasificar CLI
//!
//! Single-job SVM training entry point for the clasificar library.
//!
//! # Usage
//!
//! ```bash
//! # Train from CSV objects, export into the model directory
//! clasificar \
//!     --training_data_uri gs://bucket/data/training-*.csv \
//!     --validation_data_uri gs://bucket/data/validation-000.csv \
//!     --test_data_uri gs://bucket/data/test-000.csv \
//!     --model_dir gs://bucket/training-job
//!
//! # Train from warehouse tables
//! clasificar --data_format warehouse \
//!     --warehouse_db ./warehouse.db \
//!     --training_data_uri warehouse://project.dataset.train \
//!     --validation_data_uri warehouse://project.dataset.valid \
//!     --test_data_uri warehouse://project.dataset.test \
//!     --model_dir gs://bucket/training-job
//!
//! # Tune the classifier
//! clasificar --model_param_kernel rbf --model_param_C 0.5 ...
//! ```

use clap::Parser;
use clasificar::cli::{run_job, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_job(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
