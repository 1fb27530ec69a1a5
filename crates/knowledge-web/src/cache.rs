//! In-process cache of rendered pages keyed by request path.
//!
//! Pages are rendered once and then served from here until something
//! revalidates their path. The sitemap additionally carries a max age and is
//! rebuilt once it is older than that.

use std::{
  collections::HashMap,
  sync::{Arc, PoisonError, RwLock},
};

use chrono::{DateTime, Duration, Utc};
use knowledge_core::revalidate::{RevalidateError, Revalidator};

use crate::etag::compute_etag;

/// One stored rendering.
#[derive(Debug)]
pub struct CachedPage {
  pub body:         String,
  pub content_type: &'static str,
  pub etag:         String,
  pub rendered_at:  DateTime<Utc>,
}

impl CachedPage {
  pub fn new(
    body: String,
    content_type: &'static str,
    rendered_at: DateTime<Utc>,
  ) -> Self {
    let etag = compute_etag(body.as_bytes());
    Self { body, content_type, etag, rendered_at }
  }

  pub fn is_fresh(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
    now - self.rendered_at < max_age
  }
}

#[derive(Debug, Default)]
struct Entries {
  pages:       HashMap<String, Arc<CachedPage>>,
  /// Bumped on every invalidation of a path.
  generations: HashMap<String, u64>,
}

#[derive(Debug, Default)]
pub struct RenderCache {
  entries: RwLock<Entries>,
}

impl RenderCache {
  pub fn new() -> Self { Self::default() }

  pub fn get(&self, path: &str) -> Option<Arc<CachedPage>> {
    let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
    entries.pages.get(path).cloned()
  }

  /// Like [`Self::get`], but ignores renderings older than `max_age`.
  pub fn get_fresh(
    &self,
    path: &str,
    max_age: Duration,
    now: DateTime<Utc>,
  ) -> Option<Arc<CachedPage>> {
    self.get(path).filter(|page| page.is_fresh(max_age, now))
  }

  /// How many times `path` has been invalidated. Read before rendering and
  /// hand to [`Self::insert_if_current`].
  pub fn generation(&self, path: &str) -> u64 {
    let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
    entries.generations.get(path).copied().unwrap_or(0)
  }

  pub fn insert(&self, path: &str, page: CachedPage) -> Arc<CachedPage> {
    let page = Arc::new(page);
    let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
    entries.pages.insert(path.to_string(), page.clone());
    page
  }

  /// Store `page` only if `path` has not been invalidated since
  /// `generation` was read. The page is returned either way.
  pub fn insert_if_current(
    &self,
    path: &str,
    page: CachedPage,
    generation: u64,
  ) -> Arc<CachedPage> {
    let page = Arc::new(page);
    let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
    let current = entries.generations.get(path).copied().unwrap_or(0);
    if current == generation {
      entries.pages.insert(path.to_string(), page.clone());
    } else {
      tracing::debug!(path, "rendering outdated by revalidation, not cached");
    }
    page
  }

  /// Drop the rendering for `path`. Returns whether one was cached.
  pub fn invalidate(&self, path: &str) -> bool {
    let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
    *entries.generations.entry(path.to_string()).or_default() += 1;
    entries.pages.remove(path).is_some()
  }

  pub fn len(&self) -> usize {
    self.entries.read().unwrap_or_else(PoisonError::into_inner).pages.len()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl Revalidator for RenderCache {
  fn revalidate_path(&self, path: &str) -> Result<(), RevalidateError> {
    let dropped = self.invalidate(path);
    tracing::debug!(path, dropped, "revalidated path");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
  }

  #[test]
  fn insert_then_get() {
    let cache = RenderCache::new();
    assert!(cache.get("/knowledge").is_none());

    let page = cache.insert(
      "/knowledge",
      CachedPage::new("<html/>".into(), "text/html", at(0)),
    );
    let hit = cache.get("/knowledge").unwrap();
    assert_eq!(hit.etag, page.etag);
    assert_eq!(cache.len(), 1);
  }

  #[test]
  fn revalidating_drops_only_that_path() {
    let cache = RenderCache::new();
    cache.insert("/knowledge", CachedPage::new("a".into(), "text/html", at(0)));
    cache.insert("/knowledge/all", CachedPage::new("b".into(), "text/html", at(0)));

    cache.revalidate_path("/knowledge").unwrap();
    assert!(cache.get("/knowledge").is_none());
    assert!(cache.get("/knowledge/all").is_some());
  }

  #[test]
  fn revalidating_an_unknown_path_is_fine() {
    let cache = RenderCache::new();
    assert!(cache.revalidate_path("/never-rendered").is_ok());
    assert!(cache.is_empty());
  }

  #[test]
  fn rendering_started_before_invalidation_is_not_stored() {
    let cache = RenderCache::new();
    let generation = cache.generation("/knowledge");

    cache.revalidate_path("/knowledge").unwrap();
    let page = cache.insert_if_current(
      "/knowledge",
      CachedPage::new("old".into(), "text/html", at(0)),
      generation,
    );
    assert_eq!(page.body, "old");
    assert!(cache.get("/knowledge").is_none());

    let generation = cache.generation("/knowledge");
    cache.insert_if_current(
      "/knowledge",
      CachedPage::new("new".into(), "text/html", at(1)),
      generation,
    );
    assert_eq!(cache.get("/knowledge").unwrap().body, "new");
  }

  #[test]
  fn freshness_respects_max_age() {
    let cache = RenderCache::new();
    cache.insert("/sitemap.xml", CachedPage::new("x".into(), "application/xml", at(0)));
    let hour = Duration::seconds(3600);
    assert!(cache.get_fresh("/sitemap.xml", hour, at(3599)).is_some());
    assert!(cache.get_fresh("/sitemap.xml", hour, at(3600)).is_none());
  }
}
