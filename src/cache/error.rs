//! Error types for cache resolution.

use std::path::PathBuf;

use thiserror::Error;

use crate::path::PathError;

/// Reasons a cache could not resolve a URL to either a hit or a write target.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The URL could not be mapped to a cache identifier.
    #[error("cannot derive cache path: {0}")]
    Path(#[from] PathError),

    /// Filesystem failure other than "already exists".
    #[error("IO error creating {path}: {source}")]
    Io {
        /// The path being created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    /// Creates an IO error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
