//! Constants for the download module (size limit, timeouts, headers).

/// Bytes in one mebibyte.
pub const BYTES_PER_MIB: u64 = 1024 * 1024;

/// Default maximum payload size (30 MiB).
pub const DEFAULT_MAX_DOWNLOAD_BYTES: u64 = 30 * BYTES_PER_MIB;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large files).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// `Accept` header sent with every content request.
pub const ACCEPT_ANY: &str = "*/*";
