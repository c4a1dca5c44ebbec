//! Single-URL download orchestration through a [`FileCache`].
//!
//! [`Downloader::fetch`] issues the GET, rejects non-success statuses and
//! oversized payloads, then asks the cache whether the content is already
//! present. Only on a miss is the body streamed to disk.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_LENGTH, HeaderMap, HeaderValue};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};

use super::constants::{
    ACCEPT_ANY, CONNECT_TIMEOUT_SECS, DEFAULT_MAX_DOWNLOAD_BYTES, READ_TIMEOUT_SECS,
};
use super::error::DownloadError;
use crate::cache::{CacheResolution, FileCache};
use crate::user_agent;

/// Tunables for a [`Downloader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloaderConfig {
    /// Maximum payload size in bytes.
    pub max_bytes: u64,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub read_timeout_secs: u64,
    /// User-Agent override; `None` uses the crate default.
    pub user_agent: Option<String>,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_DOWNLOAD_BYTES,
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl DownloaderConfig {
    /// Returns this config with a different size limit.
    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

/// Fetches URLs into a cache, downloading only on a cache miss.
///
/// Cheap to clone; clones share the connection pool and the cache.
///
/// # Example
///
/// ```no_run
/// use mediacache_core::cache::{CachePolicy, build_cache};
/// use mediacache_core::download::{Downloader, DownloaderConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let cache = build_cache(&CachePolicy::Directory("./cache".into()), "static1.e621.net").await?;
/// let downloader = Downloader::new(cache, DownloaderConfig::default())?;
/// let path = downloader
///     .fetch("https://static1.e621.net/data/cc/63/cc636a8276a532dc6909acdf7f19ea05.webm")
///     .await?;
/// println!("cached at {}", path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Downloader {
    client: Client,
    cache: Arc<dyn FileCache>,
    max_bytes: u64,
}

impl fmt::Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("cache", &self.cache.to_string())
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

impl Downloader {
    /// Creates a downloader over `cache`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Client`] if the HTTP client cannot be built
    /// (for example an invalid User-Agent override).
    pub fn new(cache: Arc<dyn FileCache>, config: DownloaderConfig) -> Result<Self, DownloadError> {
        let client = build_client(&config).map_err(DownloadError::client)?;
        Ok(Self {
            client,
            cache,
            max_bytes: config.max_bytes,
        })
    }

    /// The cache this downloader resolves against.
    #[must_use]
    pub fn cache(&self) -> &dyn FileCache {
        self.cache.as_ref()
    }

    /// Configured size limit in bytes.
    #[must_use]
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Returns the local path holding the content of `url`.
    ///
    /// The request is always sent before the cache is consulted, so a cache
    /// hit still costs one round trip (the body is not read). A hit means
    /// the file exists, not that another writer has finished filling it.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::Request`] on transport failure
    /// - [`DownloadError::ResponseStatus`] on a non-2xx status
    /// - [`DownloadError::SizeLimitExceeded`] when the declared length, or
    ///   the streamed length if none was declared, exceeds the limit
    /// - [`DownloadError::Cache`] when the cache cannot resolve the URL
    /// - [`DownloadError::Write`] when the body cannot be copied to disk
    ///
    /// On the last two streaming errors the partially written file is removed.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<PathBuf, DownloadError> {
        let result = self.fetch_inner(url).await;
        if let Err(error) = &result {
            warn!(error = %error, "download failed");
        }
        result
    }

    async fn fetch_inner(&self, url: &str) -> Result<PathBuf, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::request(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::response_status(url, status.as_u16()));
        }

        match declared_content_length(&response) {
            Some(length) if length > self.max_bytes => {
                return Err(DownloadError::size_limit_exceeded(url, length, self.max_bytes));
            }
            Some(length) => debug!(content_length = length, "declared length within limit"),
            None => debug!("content length unknown; enforcing limit while streaming"),
        }

        let resolution = self
            .cache
            .resolve(url)
            .await
            .map_err(|e| DownloadError::cache(url, e))?;

        match resolution {
            CacheResolution::Hit(path) => {
                info!(path = %path.display(), "cache hit");
                drop(response);
                Ok(path)
            }
            CacheResolution::Miss(target) => {
                let (file, path) = target.into_parts();
                info!(path = %path.display(), "cache miss, downloading");

                match stream_to_file(file, response, url, &path, self.max_bytes).await {
                    Ok(bytes) => {
                        info!(path = %path.display(), bytes, "download complete");
                        Ok(path)
                    }
                    Err(error) => {
                        debug!(path = %path.display(), "removing partial file after error");
                        let _ = tokio::fs::remove_file(&path).await;
                        Err(error)
                    }
                }
            }
        }
    }
}

/// Streams the response body into `file`, returning bytes written.
///
/// Aborts once more than `limit` bytes have arrived.
async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
    limit: u64,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result
            .map_err(|e| DownloadError::write(path.to_path_buf(), std::io::Error::other(e)))?;

        bytes_written += chunk.len() as u64;
        if bytes_written > limit {
            return Err(DownloadError::size_limit_exceeded(url, bytes_written, limit));
        }

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::write(path.to_path_buf(), e))?;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::write(path.to_path_buf(), e))?;

    Ok(bytes_written)
}

/// Builds the content client.
///
/// No transparent decompression: cached files hold the remote bytes as sent,
/// and `Content-Length` stays visible for the size pre-check.
fn build_client(config: &DownloaderConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_ANY));

    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(user_agent::default_download_user_agent);

    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.read_timeout_secs))
        .user_agent(user_agent)
        .default_headers(headers)
        .build()
}

/// Reads `Content-Length`; absent, unparseable, or negative means unknown.
fn declared_content_length(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_content_length)
}

fn parse_content_length(raw: &str) -> Option<u64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|length| u64::try_from(length).ok())
}
