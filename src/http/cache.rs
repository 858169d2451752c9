//! HTTP cache control module
//!
//! `ETag` generation and `If-None-Match` evaluation for conditional GETs.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate a quoted `ETag` for the given asset bytes.
///
/// The tag only needs to change when the content changes, so a fast
/// non-cryptographic hash is enough.
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Evaluate the client's `If-None-Match` header against the server `ETag`.
///
/// Handles a single tag, a comma-separated list, and the `*` wildcard.
/// Returns true when the client copy is current and a 304 should be sent.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_tags| {
        client_tags
            .split(',')
            .any(|tag| tag.trim() == etag || tag.trim() == "*")
    })
}
