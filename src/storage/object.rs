//! Object-storage backends.
//!
//! Path-addressed storage behind the [`ObjectStore`] trait: a filesystem
//! backend where buckets map to subdirectories, an in-memory backend for
//! tests, and a GCS-shaped configuration whose `build()` currently yields a
//! mock backend.
//!
//! # Example
//!
//! ```
//! use clasificar::storage::{InMemoryBackend, ObjectStore};
//!
//! let store = InMemoryBackend::new();
//! store.put("bucket", "data/train-000.csv", b"p0\n1.0\n").unwrap();
//! let keys = store.list("bucket", "data/train-*.csv").unwrap();
//! assert_eq!(keys, ["data/train-000.csv"]);
//! ```

use glob::Pattern;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Object-storage errors.
#[derive(Debug, Error)]
pub enum ObjectError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("invalid object pattern {pattern:?}: {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type for object-storage operations.
pub type Result<T> = std::result::Result<T, ObjectError>;

/// Metadata recorded for an uploaded object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub bucket: String,
    pub key: String,
    /// SHA-256 content hash.
    pub hash: String,
    /// Size in bytes.
    pub size: u64,
    /// Upload timestamp (Unix seconds).
    pub created_at: u64,
}

impl ObjectMetadata {
    fn new(bucket: &str, key: &str, data: &[u8]) -> Self {
        Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
            hash: compute_hash(data),
            size: data.len() as u64,
            created_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }
}

/// Compute the SHA-256 hash of data.
pub fn compute_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Trait for object-storage backends.
pub trait ObjectStore: Send + Sync {
    /// Fetch the contents of an object.
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Store an object, overwriting any existing one, and return its metadata.
    fn put(&self, bucket: &str, key: &str, data: &[u8]) -> Result<ObjectMetadata>;

    /// Keys in `bucket` matching a glob pattern, sorted.
    fn list(&self, bucket: &str, pattern: &str) -> Result<Vec<String>>;

    /// Get backend type name.
    fn backend_type(&self) -> &'static str;
}

fn parse_pattern(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| ObjectError::Pattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// `*` must not cross `/`, matching filesystem glob semantics.
fn match_options() -> glob::MatchOptions {
    glob::MatchOptions {
        require_literal_separator: true,
        ..glob::MatchOptions::new()
    }
}

fn key_matches(matcher: &Pattern, key: &str) -> bool {
    matcher.matches_with(key, match_options())
}

// =============================================================================
// Filesystem Backend
// =============================================================================

/// Filesystem backend: buckets are subdirectories of `root`, keys are
/// slash-separated paths below the bucket.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the backend and ensure the root directory exists.
    pub fn new_and_init(root: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&root)?;
        Ok(Self::new(root))
    }

    fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.root.join(bucket).join(key)
    }

    fn collect_keys(dir: &Path, prefix: &str, out: &mut Vec<String>) -> Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let key = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}/{name}")
            };
            if entry.file_type()?.is_dir() {
                Self::collect_keys(&entry.path(), &key, out)?;
            } else {
                out.push(key);
            }
        }
        Ok(())
    }
}

impl ObjectStore for LocalBackend {
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(bucket, key);
        if !path.exists() {
            return Err(ObjectError::NotFound(format!("{bucket}/{key}")));
        }
        Ok(std::fs::read(path)?)
    }

    fn put(&self, bucket: &str, key: &str, data: &[u8]) -> Result<ObjectMetadata> {
        let path = self.object_path(bucket, key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, data)?;
        Ok(ObjectMetadata::new(bucket, key, data))
    }

    fn list(&self, bucket: &str, pattern: &str) -> Result<Vec<String>> {
        let matcher = parse_pattern(pattern)?;
        let bucket_dir = self.root.join(bucket);
        if !bucket_dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        Self::collect_keys(&bucket_dir, "", &mut keys)?;
        let mut keys: Vec<String> = keys.into_iter().filter(|k| key_matches(&matcher, k)).collect();
        keys.sort();
        Ok(keys)
    }

    fn backend_type(&self) -> &'static str {
        "local"
    }
}

// =============================================================================
// In-Memory Backend (for testing)
// =============================================================================

/// In-memory backend for tests; buckets and keys live in a map.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBackend {
    objects: Arc<RwLock<HashMap<String, HashMap<String, Vec<u8>>>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectStore for InMemoryBackend {
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.objects
            .read()
            .unwrap()
            .get(bucket)
            .and_then(|b| b.get(key))
            .cloned()
            .ok_or_else(|| ObjectError::NotFound(format!("{bucket}/{key}")))
    }

    fn put(&self, bucket: &str, key: &str, data: &[u8]) -> Result<ObjectMetadata> {
        self.objects
            .write()
            .unwrap()
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), data.to_vec());
        Ok(ObjectMetadata::new(bucket, key, data))
    }

    fn list(&self, bucket: &str, pattern: &str) -> Result<Vec<String>> {
        let matcher = parse_pattern(pattern)?;
        let objects = self.objects.read().unwrap();
        let mut keys: Vec<String> = objects
            .get(bucket)
            .map(|b| b.keys().filter(|k| key_matches(&matcher, k)).cloned().collect())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }

    fn backend_type(&self) -> &'static str {
        "memory"
    }
}

// =============================================================================
// GCS Configuration
// =============================================================================

/// Google Cloud Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GcsConfig {
    /// Project ID.
    pub project_id: Option<String>,
    /// Service account JSON key path.
    pub service_account_key: Option<String>,
}

impl GcsConfig {
    pub fn with_project(mut self, project_id: &str) -> Self {
        self.project_id = Some(project_id.to_string());
        self
    }

    pub fn with_service_account_key(mut self, key_path: &str) -> Self {
        self.service_account_key = Some(key_path.to_string());
        self
    }
}

/// Mock GCS backend (simulates GCS behavior in memory).
#[derive(Debug)]
pub struct MockGcsBackend {
    config: GcsConfig,
    inner: InMemoryBackend,
}

impl MockGcsBackend {
    pub fn new(config: GcsConfig) -> Self {
        Self {
            config,
            inner: InMemoryBackend::new(),
        }
    }

    pub fn config(&self) -> &GcsConfig {
        &self.config
    }
}

impl ObjectStore for MockGcsBackend {
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.inner.get(bucket, key)
    }

    fn put(&self, bucket: &str, key: &str, data: &[u8]) -> Result<ObjectMetadata> {
        self.inner.put(bucket, key, data)
    }

    fn list(&self, bucket: &str, pattern: &str) -> Result<Vec<String>> {
        self.inner.list(bucket, pattern)
    }

    fn backend_type(&self) -> &'static str {
        "gcs"
    }
}

// =============================================================================
// Unified Backend Configuration
// =============================================================================

/// Object-storage backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BackendConfig {
    /// Filesystem; buckets are subdirectories of `root`.
    Local { root: PathBuf },
    /// In-memory (for testing).
    Memory,
    /// Google Cloud Storage.
    Gcs(GcsConfig),
}

impl BackendConfig {
    /// Create a backend from this configuration.
    pub fn build(&self) -> Result<Box<dyn ObjectStore>> {
        match self {
            Self::Local { root } => Ok(Box::new(LocalBackend::new_and_init(root.clone())?)),
            Self::Memory => Ok(Box::new(InMemoryBackend::new())),
            // Real implementation would use the GCS SDK.
            Self::Gcs(config) => Ok(Box::new(MockGcsBackend::new(config.clone()))),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_compute_hash() {
        let hash = compute_hash(b"hello world");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_in_memory_put_get() {
        let store = InMemoryBackend::new();
        store.put("bucket", "a/b.csv", b"data").unwrap();
        assert_eq!(store.get("bucket", "a/b.csv").unwrap(), b"data");
    }

    #[test]
    fn test_in_memory_get_not_found() {
        let store = InMemoryBackend::new();
        assert!(matches!(
            store.get("bucket", "missing"),
            Err(ObjectError::NotFound(_))
        ));
    }

    #[test]
    fn test_in_memory_list_wildcard() {
        let store = InMemoryBackend::new();
        store.put("b", "data/training-000.csv", b"1").unwrap();
        store.put("b", "data/training-001.csv", b"2").unwrap();
        store.put("b", "data/test-000.csv", b"3").unwrap();

        let keys = store.list("b", "data/training-*.csv").unwrap();
        assert_eq!(keys, ["data/training-000.csv", "data/training-001.csv"]);
    }

    #[test]
    fn test_in_memory_list_unknown_bucket_is_empty() {
        let store = InMemoryBackend::new();
        assert!(store.list("nope", "*").unwrap().is_empty());
    }

    #[test]
    fn test_in_memory_invalid_pattern() {
        let store = InMemoryBackend::new();
        assert!(matches!(
            store.list("b", "data/[.csv"),
            Err(ObjectError::Pattern { .. })
        ));
    }

    #[test]
    fn test_put_metadata_hash_and_size() {
        let store = InMemoryBackend::new();
        let meta = store.put("bucket", "k", b"12345").unwrap();
        assert_eq!(meta.size, 5);
        assert_eq!(meta.hash, compute_hash(b"12345"));
        assert_eq!(meta.bucket, "bucket");
        assert_eq!(meta.key, "k");
        assert!(meta.created_at > 0);
    }

    #[test]
    fn test_local_put_get() {
        let tmp = TempDir::new().unwrap();
        let store = LocalBackend::new_and_init(tmp.path().to_path_buf()).unwrap();
        store.put("bucket", "job/model.bin", b"blob").unwrap();
        assert_eq!(store.get("bucket", "job/model.bin").unwrap(), b"blob");
        assert!(tmp.path().join("bucket/job/model.bin").is_file());
    }

    #[test]
    fn test_local_get_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = LocalBackend::new_and_init(tmp.path().to_path_buf()).unwrap();
        assert!(matches!(
            store.get("bucket", "missing.csv"),
            Err(ObjectError::NotFound(_))
        ));
    }

    #[test]
    fn test_local_list_wildcard_recurses() {
        let tmp = TempDir::new().unwrap();
        let store = LocalBackend::new_and_init(tmp.path().to_path_buf()).unwrap();
        store.put("b", "data/part-0.csv", b"x").unwrap();
        store.put("b", "data/nested/part-1.csv", b"y").unwrap();
        store.put("b", "other/part-2.csv", b"z").unwrap();

        let keys = store.list("b", "data/*.csv").unwrap();
        assert_eq!(keys, ["data/part-0.csv"]);

        let keys = store.list("b", "data/**/*.csv").unwrap();
        assert_eq!(keys, ["data/nested/part-1.csv", "data/part-0.csv"]);
    }

    #[test]
    fn test_local_list_missing_bucket_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = LocalBackend::new_and_init(tmp.path().to_path_buf()).unwrap();
        assert!(store.list("nope", "*").unwrap().is_empty());
    }

    #[test]
    fn test_backend_types() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(
            LocalBackend::new(tmp.path().to_path_buf()).backend_type(),
            "local"
        );
        assert_eq!(InMemoryBackend::new().backend_type(), "memory");
        assert_eq!(
            MockGcsBackend::new(GcsConfig::default()).backend_type(),
            "gcs"
        );
    }

    #[test]
    fn test_gcs_config_builders() {
        let config = GcsConfig::default()
            .with_project("my-project")
            .with_service_account_key("/secrets/key.json");
        assert_eq!(config.project_id, Some("my-project".to_string()));
        assert_eq!(
            config.service_account_key,
            Some("/secrets/key.json".to_string())
        );
    }

    #[test]
    fn test_mock_gcs_round_trip() {
        let store = MockGcsBackend::new(GcsConfig::default().with_project("p"));
        store.put("bucket", "report.txt", b"report").unwrap();
        assert_eq!(store.get("bucket", "report.txt").unwrap(), b"report");
        assert_eq!(store.config().project_id, Some("p".to_string()));
    }

    #[test]
    fn test_backend_config_build() {
        let tmp = TempDir::new().unwrap();
        let local = BackendConfig::Local {
            root: tmp.path().to_path_buf(),
        };
        assert_eq!(local.build().unwrap().backend_type(), "local");
        assert_eq!(BackendConfig::Memory.build().unwrap().backend_type(), "memory");
        assert_eq!(
            BackendConfig::Gcs(GcsConfig::default())
                .build()
                .unwrap()
                .backend_type(),
            "gcs"
        );
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_hash_deterministic(data in prop::collection::vec(any::<u8>(), 0..500)) {
            prop_assert_eq!(compute_hash(&data), compute_hash(&data));
        }

        #[test]
        fn prop_memory_round_trip(
            key in "[a-z0-9_/]{1,40}",
            data in prop::collection::vec(any::<u8>(), 1..500),
        ) {
            let store = InMemoryBackend::new();
            store.put("bucket", &key, &data).unwrap();
            prop_assert_eq!(store.get("bucket", &key).unwrap(), data);
        }
    }
}
