//! Error types for the catalog crate
//!
//! Canonicalization and merging are total; only pattern compilation and
//! catalog file access can fail.

use std::io;
use std::path::{Path, PathBuf};

/// Main catalog error type
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A built-in text pattern failed to compile
    #[error("pattern {pattern:?} failed to compile: {source}")]
    Pattern {
        /// Pattern source
        pattern: &'static str,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// Catalog file could not be read or written
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl CatalogError {
    /// Create pattern error
    #[inline]
    #[must_use]
    pub fn pattern(pattern: &'static str, source: regex::Error) -> Self {
        Self::Pattern { pattern, source }
    }
}

/// Catalog file errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("i/o error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// File exists but is not valid JSON
    #[error("invalid catalog JSON in {path}: {source}")]
    Json {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Create i/o error
    #[inline]
    #[must_use]
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create JSON error
    #[inline]
    #[must_use]
    pub fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path the error refers to
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Json { path, .. } => path,
        }
    }
}

/// Result alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_reports_path() {
        let err = StoreError::io(
            Path::new("data/conferences.json"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.path(), Path::new("data/conferences.json"));
        assert!(err.to_string().contains("data/conferences.json"));
    }

    #[test]
    fn store_error_converts_to_catalog_error() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CatalogError = StoreError::json(Path::new("c.json"), source).into();
        assert!(matches!(err, CatalogError::Store(StoreError::Json { .. })));
    }
}
