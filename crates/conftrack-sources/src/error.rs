//! Error types for source adapters
//!
//! Every variant is recoverable at the run level: a failing source
//! contributes no records and the run continues.

use std::io;
use std::path::{Path, PathBuf};

/// Source adapter error
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Transport failure (connect, timeout, body read)
    #[error("request to {url} failed: {source}")]
    Http {
        /// Requested URL
        url: String,
        /// Underlying error
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Requested URL
        url: String,
        /// Status code
        status: u16,
    },

    /// API rate limit reached
    #[error("rate limit hit on {url}; set GITHUB_TOKEN to raise it")]
    RateLimited {
        /// Requested URL
        url: String,
    },

    /// URL could not be built
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl {
        /// Offending URL
        url: String,
        /// Parser message
        reason: String,
    },

    /// Response body is not the expected JSON
    #[error("invalid JSON from {url}: {source}")]
    Json {
        /// Requested URL
        url: String,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// YAML document could not be parsed
    #[error("invalid YAML in {origin}: {source}")]
    Yaml {
        /// URL or path of the document
        origin: String,
        /// Underlying error
        #[source]
        source: serde_yaml::Error,
    },

    /// Local file could not be read
    #[error("i/o error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Client misconfiguration (bad header value, TLS backend)
    #[error("configuration error: {0}")]
    Config(String),
}

impl SourceError {
    /// Create transport error
    #[inline]
    #[must_use]
    pub fn http(url: &str, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.to_string(),
            source,
        }
    }

    /// Create JSON error
    #[inline]
    #[must_use]
    pub fn json(url: &str, source: serde_json::Error) -> Self {
        Self::Json {
            url: url.to_string(),
            source,
        }
    }

    /// Create YAML error
    #[inline]
    #[must_use]
    pub fn yaml(origin: impl Into<String>, source: serde_yaml::Error) -> Self {
        Self::Yaml {
            origin: origin.into(),
            source,
        }
    }

    /// Create i/o error
    #[inline]
    #[must_use]
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Check if retrying with credentials could help
    #[inline]
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

/// Result alias for source operations
pub type SourceResult<T> = Result<T, SourceError>;
