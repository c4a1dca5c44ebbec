//! Post records as served by the metadata API.
//!
//! Only the fields the download pipeline consumes are modelled. Records are
//! deserialized with `serde`; unknown fields are ignored and missing ones
//! default, since the API omits fields on deleted or restricted posts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::blacklist::Blacklist;
use crate::path::content_url;

/// Site base for post pages.
const SITE_URL: &str = "https://e621.net";

/// A single post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub id: u64,
    /// Tags grouped by category (`general`, `species`, ...).
    pub tags: BTreeMap<String, Vec<String>>,
    pub file: PostFile,
    pub sample: SampleFile,
    pub preview: PreviewFile,
    pub rating: String,
}

/// The original upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostFile {
    /// Direct URL; `null` or empty for some posts.
    pub url: Option<String>,
    pub width: u32,
    pub height: u32,
    pub ext: String,
    /// Declared size in bytes. Informational only; the downloader trusts
    /// response headers instead.
    pub size: u64,
    pub md5: String,
}

/// Downscaled sample rendition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleFile {
    pub url: Option<String>,
    pub width: u32,
    pub height: u32,
}

/// Thumbnail rendition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewFile {
    pub url: Option<String>,
    pub width: u32,
    pub height: u32,
}

/// `{"post": {...}}` envelope of the single-post endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostPage {
    pub post: Post,
}

/// `{"posts": [...]}` envelope of the search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostsPage {
    #[serde(default)]
    pub posts: Vec<Post>,
}

impl Post {
    /// Public page of this post.
    #[must_use]
    pub fn page_url(&self) -> String {
        format!("{SITE_URL}/posts/{}", self.id)
    }

    /// All tags across categories, in category order.
    #[must_use]
    pub fn flat_tags(&self) -> Vec<&str> {
        self.tags.values().flatten().map(String::as_str).collect()
    }

    /// Value of a meta tag usable in searches; `None` if unsupported.
    #[must_use]
    pub fn meta_tag(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.to_string()),
            "md5" => Some(self.file.md5.clone()),
            "rating" => Some(self.rating.clone()),
            _ => None,
        }
    }
}

impl PostsPage {
    /// File URLs of every post not hidden by `blacklist`, in page order.
    ///
    /// Posts without a usable URL are skipped.
    #[must_use]
    pub fn download_urls(&self, blacklist: &Blacklist, storage_host: &str) -> Vec<String> {
        self.posts
            .iter()
            .filter(|post| {
                let hidden = blacklist.matches(post.flat_tags());
                if hidden {
                    debug!(post_id = post.id, "post blacklisted, skipping");
                }
                !hidden
            })
            .filter_map(|post| post.file.download_url(storage_host))
            .collect()
    }
}

impl PostFile {
    /// URL to download the file from.
    ///
    /// Falls back to rebuilding it from `md5` and `ext` on `storage_host` when
    /// the API left `url` unset. Returns `None` if that is impossible too.
    #[must_use]
    pub fn download_url(&self, storage_host: &str) -> Option<String> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            return Some(url.to_string());
        }

        warn!(md5 = %self.md5, "post file url not set, rebuilding from md5");
        content_url(storage_host, &self.md5, &self.ext)
    }
}

/// Turns tag escaping (`this_text`) back into display text (`this text`).
#[must_use]
pub fn textify_escaped(escaped: &str) -> String {
    escaped.replace('_', " ")
}
