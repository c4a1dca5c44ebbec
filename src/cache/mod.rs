//! Pluggable cache policies deciding where downloaded content lives.
//!
//! A [`FileCache`] answers one question for a URL: is the content already on
//! disk ([`CacheResolution::Hit`]), or must the caller write it into a fresh,
//! exclusively owned file ([`CacheResolution::Miss`])? Failures are the `Err`
//! arm of the returned `Result`.
//!
//! # Policies
//!
//! - [`EphemeralCache`] - every call is a miss into a new uniquely named file
//! - [`DirectoryCache`] - flat directory keyed by [`PathExtractor`] identifiers,
//!   deduplicated with an atomic create-exclusive open
//!
//! The directory cache keeps no in-memory table of in-flight downloads. The
//! exclusive create is the only coordination point, so it holds across
//! processes sharing the same root. A hit only means the file exists; its
//! writer may still be streaming into it.
//!
//! [`PathExtractor`]: crate::path::PathExtractor

mod directory;
mod ephemeral;
mod error;

pub use directory::DirectoryCache;
pub use ephemeral::EphemeralCache;
pub use error::CacheError;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs::File;

use crate::path::StoragePathExtractor;

/// A cache lookup policy.
#[async_trait]
pub trait FileCache: fmt::Display + Send + Sync {
    /// Looks up `url`, claiming a write target when the content is absent.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the URL cannot be mapped or the target
    /// cannot be created for a reason other than it already existing.
    async fn resolve(&self, url: &str) -> Result<CacheResolution, CacheError>;
}

/// Outcome of a successful cache lookup.
#[derive(Debug)]
pub enum CacheResolution {
    /// Content is already present at this path.
    Hit(PathBuf),
    /// Content is absent; the caller owns the target and must fill it.
    Miss(WritableTarget),
}

/// A freshly created, empty file exclusively owned by the caller.
///
/// Dropping the target closes the handle. The file itself stays on disk.
#[derive(Debug)]
pub struct WritableTarget {
    file: File,
    path: PathBuf,
}

impl WritableTarget {
    pub(crate) fn new(file: File, path: PathBuf) -> Self {
        Self { file, path }
    }

    /// Final location of the content.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Splits the target into its open handle and path.
    #[must_use]
    pub fn into_parts(self) -> (File, PathBuf) {
        (self.file, self.path)
    }
}

/// Configured cache policy, turned into a [`FileCache`] by [`build_cache`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Fresh temporary file per download, no deduplication.
    #[default]
    Ephemeral,
    /// Deduplicating cache rooted at the given directory.
    Directory(PathBuf),
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ephemeral => f.write_str("ephemeral"),
            Self::Directory(root) => write!(f, "directory:{}", root.display()),
        }
    }
}

/// Builds the cache selected by `policy`.
///
/// `storage_host` is the only host the directory cache accepts URLs for.
///
/// # Errors
///
/// Returns [`CacheError::Io`] if the directory cache root cannot be created.
pub async fn build_cache(
    policy: &CachePolicy,
    storage_host: &str,
) -> Result<Arc<dyn FileCache>, CacheError> {
    match policy {
        CachePolicy::Ephemeral => Ok(Arc::new(EphemeralCache::new())),
        CachePolicy::Directory(root) => {
            let cache =
                DirectoryCache::create(root, StoragePathExtractor::new(storage_host)).await?;
            Ok(Arc::new(cache))
        }
    }
}
