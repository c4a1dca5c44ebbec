//! Cache identifier derivation from storage URLs.
//!
//! The media host shards content under `/data` into two levels of hash-prefix
//! directories, with an optional variant subtree (`preview`, `sample`) in
//! front:
//!
//! ```text
//! /data/{h2}/{h4}/{file}            -> {file}
//! /data/{variant}/{h2}/{h4}/{file}  -> {variant}_{file}
//! ```
//!
//! Folding the variant into the filename keeps the local cache flat while
//! keeping an original apart from its previews and samples.
//!
//! # Example
//!
//! ```
//! use mediacache_core::path::{PathExtractor, StoragePathExtractor};
//!
//! let extractor = StoragePathExtractor::default();
//! let id = extractor
//!     .derive("https://static1.e621.net/data/preview/de/08/de08688f663a5cc8e44dfde508d84093.jpg")
//!     .unwrap();
//! assert_eq!(id, "preview_de08688f663a5cc8e44dfde508d84093.jpg");
//! ```

mod error;

pub use error::PathError;

use tracing::trace;
use url::Url;

/// Host serving content files.
pub const DEFAULT_STORAGE_HOST: &str = "static1.e621.net";

/// First path segment of every content URL.
const DATA_SEGMENT: &str = "data";

/// Derives a stable, flat cache identifier from a content URL.
///
/// Implementations must be deterministic and must never return an identifier
/// containing path separators or traversal segments.
pub trait PathExtractor: Send + Sync {
    /// Returns the identifier for `url`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] when the URL is not a recognised content URL.
    fn derive(&self, url: &str) -> Result<String, PathError>;
}

/// [`PathExtractor`] for the hash-sharded `/data` layout of a single host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePathExtractor {
    host: String,
}

impl Default for StoragePathExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_HOST)
    }
}

impl StoragePathExtractor {
    /// Creates an extractor accepting URLs for `host` only.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    /// The only host this extractor accepts.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl PathExtractor for StoragePathExtractor {
    fn derive(&self, url: &str) -> Result<String, PathError> {
        let parsed = Url::parse(url).map_err(|e| PathError::invalid_url(url, &e))?;

        let host = parsed.host_str().unwrap_or_default();
        if host != self.host {
            return Err(PathError::wrong_host(host));
        }

        // Consecutive and trailing slashes collapse.
        let segments: Vec<&str> = parsed.path().split('/').filter(|s| !s.is_empty()).collect();

        let Some((first, rest)) = segments.split_first() else {
            return Err(PathError::malformed(url, "empty path"));
        };
        if *first != DATA_SEGMENT {
            return Err(PathError::malformed(
                url,
                format!("path not starting with '{DATA_SEGMENT}' but '{first}'"),
            ));
        }

        if let Some(bad) = rest.iter().find(|s| !is_safe_segment(s)) {
            return Err(PathError::malformed(url, format!("unsafe segment '{bad}'")));
        }

        let identifier = match rest {
            [_, _, filename] => (*filename).to_string(),
            [variant, _, _, filename] => format!("{variant}_{filename}"),
            _ => {
                return Err(PathError::malformed(
                    url,
                    format!("expected 3 or 4 segments after '{DATA_SEGMENT}', got {}", rest.len()),
                ));
            }
        };

        trace!(url, identifier = %identifier, "derived cache identifier");
        Ok(identifier)
    }
}

fn is_safe_segment(segment: &str) -> bool {
    segment != "." && segment != ".." && !segment.contains(['\\', '\0'])
}

/// Builds the canonical content URL for a file from its md5 and extension.
///
/// This is the inverse of the three-segment layout: `md5[0..2]/md5[2..4]/md5.ext`.
/// Returns `None` when `md5` is too short or not ASCII.
#[must_use]
pub fn content_url(host: &str, md5: &str, ext: &str) -> Option<String> {
    if md5.len() < 4 || !md5.is_ascii() {
        return None;
    }
    Some(format!(
        "https://{host}/{DATA_SEGMENT}/{}/{}/{md5}.{ext}",
        &md5[0..2],
        &md5[2..4]
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn extractor() -> StoragePathExtractor {
        StoragePathExtractor::default()
    }

    #[test]
    fn test_derive_canonical_file() {
        let id = extractor()
            .derive("https://static1.e621.net/data/cc/63/cc636a8276a532dc6909acdf7f19ea05.webm")
            .unwrap();
        assert_eq!(id, "cc636a8276a532dc6909acdf7f19ea05.webm");
    }

    #[test]
    fn test_derive_preview_variant() {
        let id = extractor()
            .derive(
                "https://static1.e621.net/data/preview/de/08/de08688f663a5cc8e44dfde508d84093.jpg",
            )
            .unwrap();
        assert_eq!(id, "preview_de08688f663a5cc8e44dfde508d84093.jpg");
    }

    #[test]
    fn test_derive_sample_variant() {
        let id = extractor()
            .derive(
                "https://static1.e621.net/data/sample/de/08/de08688f663a5cc8e44dfde508d84093.jpg",
            )
            .unwrap();
        assert_eq!(id, "sample_de08688f663a5cc8e44dfde508d84093.jpg");
    }

    #[test]
    fn test_derive_wrong_host() {
        let err = extractor()
            .derive("https://static2.e621.net/data/sample/de/08/de08688f663a5cc8e44dfde508d84093.jpg")
            .unwrap_err();
        assert_eq!(err, PathError::wrong_host("static2.e621.net"));
        assert_eq!(err.to_string(), "wrong host static2.e621.net");
    }

    #[test]
    fn test_derive_ignores_port_when_matching_host() {
        let extractor = StoragePathExtractor::new("127.0.0.1");
        let id = extractor
            .derive("http://127.0.0.1:8080/data/ab/cd/abcd.png")
            .unwrap();
        assert_eq!(id, "abcd.png");
    }

    #[test]
    fn test_derive_rejects_path_without_data_prefix() {
        let err = extractor()
            .derive("https://static1.e621.net/files/ab/cd/abcd.png")
            .unwrap_err();
        assert!(matches!(err, PathError::MalformedPath { .. }), "got {err:?}");
    }

    #[test]
    fn test_derive_rejects_wrong_segment_counts() {
        for url in [
            "https://static1.e621.net/data/abcd.png",
            "https://static1.e621.net/data/cd/abcd.png",
            "https://static1.e621.net/data/a/b/c/d/abcd.png",
            "https://static1.e621.net/data",
        ] {
            let err = extractor().derive(url).unwrap_err();
            assert!(
                matches!(err, PathError::MalformedPath { .. }),
                "{url} should be malformed, got {err:?}"
            );
        }
    }

    #[test]
    fn test_derive_empty_path_is_malformed() {
        let err = extractor().derive("https://static1.e621.net/").unwrap_err();
        assert!(matches!(err, PathError::MalformedPath { .. }), "got {err:?}");
    }

    #[test]
    fn test_derive_collapses_duplicate_and_trailing_slashes() {
        let id = extractor()
            .derive("https://static1.e621.net//data/ab//cd/abcd.png/")
            .unwrap();
        assert_eq!(id, "abcd.png");
    }

    #[test]
    fn test_derive_dot_segments_cannot_escape_data_root() {
        let err = extractor()
            .derive("https://static1.e621.net/data/ab/cd/../../../etc/passwd")
            .unwrap_err();
        assert!(matches!(err, PathError::MalformedPath { .. }), "got {err:?}");
    }

    #[test]
    fn test_derive_identifier_never_contains_separator() {
        let id = extractor()
            .derive("https://static1.e621.net/data/ab/cd/a%2Fb.png")
            .unwrap();
        assert!(!id.contains('/'), "identifier must stay flat: {id}");
    }

    #[test]
    fn test_derive_invalid_url() {
        let err = extractor().derive("not a url").unwrap_err();
        assert!(matches!(err, PathError::InvalidUrl { .. }), "got {err:?}");
    }

    #[test]
    fn test_derive_is_deterministic() {
        let url = "https://static1.e621.net/data/sample/de/08/de08.jpg";
        assert_eq!(extractor().derive(url), extractor().derive(url));
    }

    #[test]
    fn test_is_safe_segment() {
        assert!(is_safe_segment("abcd.png"));
        assert!(!is_safe_segment(".."));
        assert!(!is_safe_segment("."));
        assert!(!is_safe_segment("a\\b"));
    }

    #[test]
    fn test_content_url_two_level_prefix() {
        assert_eq!(
            content_url(DEFAULT_STORAGE_HOST, "e24e3ce9944afc88e8c8204dd279940d", "png").as_deref(),
            Some("https://static1.e621.net/data/e2/4e/e24e3ce9944afc88e8c8204dd279940d.png")
        );
    }

    #[test]
    fn test_content_url_round_trips_through_derive() {
        let url = content_url(DEFAULT_STORAGE_HOST, "cc636a8276a532dc6909acdf7f19ea05", "webm")
            .unwrap();
        assert_eq!(
            extractor().derive(&url).unwrap(),
            "cc636a8276a532dc6909acdf7f19ea05.webm"
        );
    }

    #[test]
    fn test_content_url_rejects_short_md5() {
        assert_eq!(content_url(DEFAULT_STORAGE_HOST, "abc", "png"), None);
        assert_eq!(content_url(DEFAULT_STORAGE_HOST, "", "png"), None);
    }
}
