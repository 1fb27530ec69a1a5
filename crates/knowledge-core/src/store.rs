//! The `ContentStore` trait.
//!
//! Implemented by storage backends (e.g. `knowledge-store-sqlite`). The web
//! layer depends on this abstraction, not on any concrete backend. Only the
//! read side lives here; authoring happens elsewhere.

use std::future::Future;

use crate::article::Article;

/// Read access to published content.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ContentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every published article, newest publication first. Ties are broken by
  /// slug so repeated calls over the same data return the same order.
  fn list_published(
    &self,
  ) -> impl Future<Output = Result<Vec<Article>, Self::Error>> + Send + '_;

  /// The published article with this slug, or `None`. Drafts are never
  /// returned.
  fn get_published<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Option<Article>, Self::Error>> + Send + 'a;
}
