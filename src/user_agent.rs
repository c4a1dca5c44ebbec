//! User-Agent string for content requests.
//!
//! The media host asks clients to identify themselves; keep the format in one
//! place so every request carries the same identity.

/// Tool description appended to the name/version pair.
const UA_DESCRIPTION: &str = "caching media downloader";

/// Default User-Agent for download requests (identifies the tool).
#[must_use]
pub(crate) fn default_download_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("mediacache/{version} ({UA_DESCRIPTION})")
}
