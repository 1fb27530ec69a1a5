//! Revalidation: which cached renderings a content change invalidates, and
//! the trait the cache collaborator implements.

use thiserror::Error;

use crate::{Error, Result, site::SiteConfig};

/// Failure reported by the rendering cache while invalidating a path.
#[derive(Debug, Error)]
#[error("failed to revalidate {path}: {reason}")]
pub struct RevalidateError {
  pub path:   String,
  pub reason: String,
}

/// The platform primitive "invalidate the cached rendering of path P".
///
/// Invalidating a path that was never rendered is a no-op, not an error.
pub trait Revalidator: Send + Sync {
  fn revalidate_path(&self, path: &str) -> Result<(), RevalidateError>;
}

/// Trim and check a slug received from outside.
pub fn validate_slug(raw: &str) -> Result<&str> {
  let slug = raw.trim();
  if slug.is_empty() {
    return Err(Error::MissingSlug);
  }
  if slug
    .chars()
    .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
  {
    return Err(Error::InvalidSlug(slug.to_string()));
  }
  Ok(slug)
}

/// The article's detail page plus both listing roots. Listing pages are not
/// inspected for which articles they embed; all of them are treated as stale.
pub fn revalidation_paths(site: &SiteConfig, slug: &str) -> [String; 3] {
  [
    site.article_path(slug),
    site.listing_root().to_string(),
    site.listing_all_path(),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::site::fixtures::site;

  #[test]
  fn paths_for_slug() {
    assert_eq!(revalidation_paths(&site(), "foo"), [
      "/knowledge/foo",
      "/knowledge",
      "/knowledge/all",
    ]);
  }

  #[test]
  fn paths_are_stable_across_calls() {
    let s = site();
    assert_eq!(revalidation_paths(&s, "foo"), revalidation_paths(&s, "foo"));
  }

  #[test]
  fn slug_validation() {
    assert_eq!(validate_slug("  foo ").unwrap(), "foo");
    assert!(matches!(validate_slug("   "), Err(Error::MissingSlug)));
    assert!(matches!(validate_slug("a/b"), Err(Error::InvalidSlug(_))));
    assert!(matches!(validate_slug("a b"), Err(Error::InvalidSlug(_))));
    assert!(matches!(validate_slug("a?x=1"), Err(Error::InvalidSlug(_))));
  }
}
