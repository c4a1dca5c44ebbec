//! Error types for storage path derivation.

use thiserror::Error;

/// Errors that can occur while deriving a cache identifier from a content URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The URL could not be parsed at all.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The URL does not point at the expected storage host.
    #[error("wrong host {host}")]
    WrongHost {
        /// Host found in the URL (empty when the URL has none).
        host: String,
    },

    /// The URL path does not follow the storage layout.
    #[error("malformed storage path in '{url}': {reason}")]
    MalformedPath {
        /// The offending URL.
        url: String,
        /// Which part of the layout was violated.
        reason: String,
    },
}

impl PathError {
    /// Creates an `InvalidUrl` error from a `url` parse failure.
    #[must_use]
    pub fn invalid_url(url: &str, source: &url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: source.to_string(),
        }
    }

    /// Creates a `WrongHost` error.
    #[must_use]
    pub fn wrong_host(host: impl Into<String>) -> Self {
        Self::WrongHost { host: host.into() }
    }

    /// Creates a `MalformedPath` error.
    #[must_use]
    pub fn malformed(url: &str, reason: impl Into<String>) -> Self {
        Self::MalformedPath {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}
