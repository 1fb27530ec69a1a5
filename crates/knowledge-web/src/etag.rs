//! ETag computation for cached renderings.
//!
//! An ETag is the quoted SHA-256 hex digest of the rendered body, so two
//! renders with identical output share a tag and conditional requests keep
//! hitting across revalidations that changed nothing.

use sha2::{Digest, Sha256};

pub fn compute_etag(body: &[u8]) -> String {
  let hash = Sha256::digest(body);
  format!("\"{}\"", hex::encode(hash))
}

/// Whether an `If-None-Match` header value matches `etag`.
///
/// Accepts `*`, comma-separated lists, weak validators and bare (unquoted)
/// tags.
pub fn if_none_match(header: &str, etag: &str) -> bool {
  let etag = strip_etag(etag);
  header.split(',').map(str::trim).any(|candidate| {
    candidate == "*" || strip_etag(candidate) == etag
  })
}

fn strip_etag(s: &str) -> &str {
  s.strip_prefix("W/").unwrap_or(s).trim_matches('"')
}
