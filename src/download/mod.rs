//! HTTP fetch layer that fills a [`FileCache`](crate::cache::FileCache).
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large files)
//! - Size limit checked against `Content-Length` before the cache is touched,
//!   and against the streamed byte count when no length is declared
//! - Fixed `User-Agent` and `Accept` headers
//! - No retries: every error is terminal for its `fetch` call
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mediacache_core::cache::EphemeralCache;
//! use mediacache_core::download::{Downloader, DownloaderConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = Downloader::new(Arc::new(EphemeralCache::new()), DownloaderConfig::default())?;
//! let path = downloader.fetch("https://static1.e621.net/data/ab/cd/abcd.png").await?;
//! println!("Downloaded: {}", path.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;

pub use client::{Downloader, DownloaderConfig};
pub use constants::{BYTES_PER_MIB, DEFAULT_MAX_DOWNLOAD_BYTES};
pub use error::DownloadError;

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
