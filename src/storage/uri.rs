//! Object-storage URI decomposition.

use std::fmt;

use crate::{Error, Result};

/// Scheme token accepted by the artifact exporters.
pub const OBJECT_STORAGE_SCHEME: &str = "gs";

/// A `scheme://bucket/path[/file]` URI broken into its four parts.
///
/// The final path segment is treated as a file when it contains a `.`, so a
/// directory named e.g. `v1.2` parses as a file. That ambiguity is inherited
/// behavior; see `dotted_directory_parses_as_file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageUri {
    pub scheme: String,
    pub bucket: String,
    pub path: String,
    pub file: String,
}

impl StorageUri {
    /// Split on `/`: token 0 is the scheme (colon stripped), token 2 the
    /// bucket, the rest the path; a trailing slash on the path is removed.
    pub fn parse(uri: &str) -> Result<Self> {
        let mut parts: Vec<&str> = uri.split('/').collect();
        if parts.len() < 3 {
            return Err(Error::Uri(format!(
                "expected scheme://bucket/path, got {uri:?}"
            )));
        }
        let file = match parts.last() {
            Some(last) if last.contains('.') => parts.pop().unwrap_or_default().to_string(),
            _ => String::new(),
        };
        let scheme = parts[0].trim_end_matches(':').to_string();
        let bucket = parts.get(2).copied().unwrap_or_default().to_string();
        let path = parts.get(3..).unwrap_or_default().join("/");
        let path = path.strip_suffix('/').unwrap_or(&path).to_string();
        Ok(Self {
            scheme,
            bucket,
            path,
            file,
        })
    }

    /// Fail unless the scheme is the object-storage scheme token.
    pub fn expect_object_storage(&self) -> Result<()> {
        if self.scheme != OBJECT_STORAGE_SCHEME {
            return Err(Error::Scheme {
                got: self.scheme.clone(),
            });
        }
        Ok(())
    }

    /// Object key for `name` under this URI's path.
    pub fn object_key(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.path, name)
        }
    }

    /// Full URI for an object key in this URI's bucket.
    pub fn object_uri(&self, key: &str) -> String {
        format!("{}://{}/{}", self.scheme, self.bucket, key)
    }
}

impl fmt::Display for StorageUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.bucket)?;
        if !self.path.is_empty() {
            write!(f, "/{}", self.path)?;
        }
        if !self.file.is_empty() {
            write!(f, "/{}", self.file)?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_round_trip(
            bucket in "[a-z][a-z0-9-]{0,20}",
            path in "[a-z0-9_]{1,10}(/[a-z0-9_]{1,10}){0,3}",
            stem in "[a-z0-9_]{1,10}",
            ext in "[a-z]{1,4}",
        ) {
            let file = format!("{stem}.{ext}");
            let uri = StorageUri::parse(&format!("gs://{bucket}/{path}/{file}")).unwrap();
            prop_assert_eq!(uri.scheme, "gs");
            prop_assert_eq!(uri.bucket, bucket);
            prop_assert_eq!(uri.path, path);
            prop_assert_eq!(uri.file, file);
        }

        #[test]
        fn prop_dirs_without_dots_never_yield_a_file(
            bucket in "[a-z][a-z0-9-]{0,20}",
            path in "[a-z0-9_]{1,10}(/[a-z0-9_]{1,10}){0,3}",
        ) {
            let uri = StorageUri::parse(&format!("gs://{bucket}/{path}")).unwrap();
            prop_assert_eq!(uri.file, "");
            prop_assert_eq!(uri.path, path);
        }
    }
}
