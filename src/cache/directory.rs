//! Deduplicating cache backed by a flat directory.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tracing::{debug, instrument};

use super::{CacheError, CacheResolution, FileCache, WritableTarget};
use crate::path::{PathExtractor, StoragePathExtractor};

/// Stores each URL's content at `root/<identifier>`.
///
/// Lookup and claim are one `create_new` open: the caller that creates the
/// file gets a [`CacheResolution::Miss`], everyone else sees a hit. Files are
/// never overwritten or removed by the cache itself.
#[derive(Debug, Clone)]
pub struct DirectoryCache<E = StoragePathExtractor> {
    root: PathBuf,
    extractor: E,
}

impl<E: PathExtractor> DirectoryCache<E> {
    /// Creates a cache over an existing `root` directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, extractor: E) -> Self {
        Self {
            root: root.into(),
            extractor,
        }
    }

    /// Creates `root` (and parents) if needed, then the cache over it.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the directory cannot be created.
    pub async fn create(root: impl Into<PathBuf>, extractor: E) -> Result<Self, CacheError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| CacheError::io(root.clone(), e))?;
        Ok(Self::new(root, extractor))
    }

    /// The cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl<E> fmt::Display for DirectoryCache<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DirectoryCache(directory: \"{}\")", self.root.display())
    }
}

#[async_trait]
impl<E: PathExtractor + 'static> FileCache for DirectoryCache<E> {
    #[instrument(level = "debug", skip(self), fields(root = %self.root.display()))]
    async fn resolve(&self, url: &str) -> Result<CacheResolution, CacheError> {
        let identifier = self.extractor.derive(url)?;
        let path = self.root.join(&identifier);

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => {
                debug!(path = %path.display(), "claimed cache entry");
                Ok(CacheResolution::Miss(WritableTarget::new(file, path)))
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "cache entry exists");
                Ok(CacheResolution::Hit(path))
            }
            Err(err) => Err(CacheError::io(path, err)),
        }
    }
}
