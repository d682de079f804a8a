//! The standardize -> SVM pipeline, cross-validated training and
//! classification metrics.

mod metrics;
mod pipeline;
mod trainer;

pub use metrics::{accuracy, classification_report, weighted_f1, ClassMetrics};
pub use pipeline::{
    FittedPipeline, Kernel, LabelEncoder, PipelineSpec, StandardScaler, SvcParams,
};
pub use trainer::{cross_validate, train, CV_FOLDS};
