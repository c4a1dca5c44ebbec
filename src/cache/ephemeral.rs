//! Cache policy that never reuses content.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::File;
use tracing::debug;

use super::{CacheError, CacheResolution, FileCache, WritableTarget};

const TEMP_PREFIX: &str = "mediacache-";

/// Allocates a new uniquely named file for every lookup.
///
/// No identifier is derived and nothing is deduplicated. File creation runs
/// on the blocking pool. Files are persisted
/// (not deleted on drop) so the returned path stays valid for the caller.
#[derive(Debug, Clone, Default)]
pub struct EphemeralCache {
    dir: Option<PathBuf>,
}

impl EphemeralCache {
    /// Creates files in the system temporary directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates files in `dir` instead of the system temporary directory.
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    fn base_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl fmt::Display for EphemeralCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EphemeralCache(directory: \"{}\")", self.base_dir().display())
    }
}

#[async_trait]
impl FileCache for EphemeralCache {
    async fn resolve(&self, url: &str) -> Result<CacheResolution, CacheError> {
        let dir = self.base_dir();
        let blocking_dir = dir.clone();
        let (file, path) = tokio::task::spawn_blocking(move || allocate(&blocking_dir))
            .await
            .map_err(|e| CacheError::io(dir.clone(), io::Error::other(e)))??;

        debug!(url, path = %path.display(), "allocated ephemeral target");
        Ok(CacheResolution::Miss(WritableTarget::new(
            File::from_std(file),
            path,
        )))
    }
}

/// Creates and persists a uniquely named file in `dir`.
fn allocate(dir: &Path) -> Result<(std::fs::File, PathBuf), CacheError> {
    let temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(dir)
        .map_err(|e| CacheError::io(dir.to_path_buf(), e))?;
    temp.keep()
        .map_err(|e| CacheError::io(dir.to_path_buf(), e.error))
}
