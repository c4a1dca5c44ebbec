//! Error types for the download module.
//!
//! Every variant carries the URL or path it concerns so a failed fetch can be
//! logged and skipped without extra context from the caller.

use std::path::PathBuf;

use thiserror::Error;

use super::constants::BYTES_PER_MIB;
use crate::cache::CacheError;

/// Errors that can occur while fetching a URL through the cache.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    Client {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// Transport-level failure (DNS, connect, TLS, timeout, invalid URL).
    #[error("request error for {url}: {source}")]
    Request {
        /// The URL being fetched.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("HTTP status {status} for {url}")]
    ResponseStatus {
        /// The URL being fetched.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The payload is larger than the configured limit.
    #[error("maximum size of {} MB exceeded for {url}, has {size_mb} MB", limit_bytes / BYTES_PER_MIB)]
    SizeLimitExceeded {
        /// The URL being fetched.
        url: String,
        /// Reported (or observed, when streaming) size in whole MiB.
        size_mb: u64,
        /// Configured limit in bytes.
        limit_bytes: u64,
    },

    /// The cache could not resolve the URL.
    #[error("cache resolution failed for {url}: {source}")]
    Cache {
        /// The URL being fetched.
        url: String,
        /// The underlying cache error.
        #[source]
        source: CacheError,
    },

    /// Copying the response body into the cache target failed.
    #[error("write error for {path}: {source}")]
    Write {
        /// The target being written.
        path: PathBuf,
        /// The underlying IO (or body stream) error.
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Creates a client construction error.
    pub fn client(source: reqwest::Error) -> Self {
        Self::Client { source }
    }

    /// Creates a transport error.
    pub fn request(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Request {
            url: url.into(),
            source,
        }
    }

    /// Creates a status error.
    pub fn response_status(url: impl Into<String>, status: u16) -> Self {
        Self::ResponseStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a size limit error from a byte count.
    pub fn size_limit_exceeded(url: impl Into<String>, size_bytes: u64, limit_bytes: u64) -> Self {
        Self::SizeLimitExceeded {
            url: url.into(),
            size_mb: size_bytes / BYTES_PER_MIB,
            limit_bytes,
        }
    }

    /// Creates a cache resolution error.
    pub fn cache(url: impl Into<String>, source: CacheError) -> Self {
        Self::Cache {
            url: url.into(),
            source,
        }
    }

    /// Creates a write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: every variant needs the
// URL or path, which the source errors do not carry.
