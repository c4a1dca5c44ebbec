//! Media Cache Core Library
//!
//! Resolves content URLs from a media host to local files, downloading each
//! file at most once per cache directory and refusing oversized payloads.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`path`] - Cache identifier derivation from storage URLs
//! - [`cache`] - Pluggable cache policies (ephemeral, directory-backed)
//! - [`download`] - HTTP fetch, size limiting, and streaming into the cache
//! - [`post`] - Metadata records that carry content URLs
//! - [`blacklist`] - Tag blacklist matching for filtering posts

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod blacklist;
pub mod cache;
pub mod download;
pub mod path;
pub mod post;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use blacklist::{Blacklist, BlacklistEntry};
pub use cache::{
    CacheError, CachePolicy, CacheResolution, DirectoryCache, EphemeralCache, FileCache,
    WritableTarget, build_cache,
};
pub use download::{DEFAULT_MAX_DOWNLOAD_BYTES, DownloadError, Downloader, DownloaderConfig};
pub use path::{DEFAULT_STORAGE_HOST, PathError, PathExtractor, StoragePathExtractor};
pub use post::{Post, PostFile, PostsPage};
