//! Artifact export to object storage.

use crate::model::FittedPipeline;
use crate::storage::{ObjectStore, StorageUri};
use crate::Result;

/// Object name for the serialized model.
pub const MODEL_OBJECT: &str = "model.bin";
/// Object name for the training report.
pub const REPORT_OBJECT: &str = "report.txt";

/// Serialize the fitted pipeline and write it under the model directory.
/// Returns the full destination URI.
pub fn export_model(
    store: &dyn ObjectStore,
    model_dir: &str,
    pipeline: &FittedPipeline,
) -> Result<String> {
    let blob = pipeline.to_bytes()?;
    export_blob(store, model_dir, MODEL_OBJECT, &blob)
}

/// Write the report text under the model directory. Returns the full
/// destination URI.
pub fn export_report(store: &dyn ObjectStore, model_dir: &str, report: &str) -> Result<String> {
    export_blob(store, model_dir, REPORT_OBJECT, report.as_bytes())
}

fn export_blob(
    store: &dyn ObjectStore,
    model_dir: &str,
    name: &str,
    data: &[u8],
) -> Result<String> {
    let uri = StorageUri::parse(model_dir)?;
    uri.expect_object_storage()?;
    let key = uri.object_key(name);
    store.put(&uri.bucket, &key, data)?;

    Ok(uri.object_uri(&key))
}
