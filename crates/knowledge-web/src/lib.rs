//! HTTP layer for the knowledge site.
//!
//! Exposes an axum [`Router`] serving the public pages, the sitemap, the
//! crawler policy, the structured-data API and the revalidation endpoint,
//! backed by any [`ContentStore`].

pub mod cache;
pub mod error;
pub mod etag;
pub mod handlers;
pub mod html;
pub mod robots;
pub mod sitemap;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use chrono::Duration;
use knowledge_core::{
  revalidate::Revalidator, site::SiteConfig, store::ContentStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use cache::RenderCache;
use handlers::{pages, revalidate, robots as robots_handler, structured_data};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `KNOWLEDGE__*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  pub store_path:       PathBuf,
  /// Max age of the cached XML sitemap, and the period of the background
  /// rebuild.
  #[serde(default = "default_sitemap_ttl_secs")]
  pub sitemap_ttl_secs: u64,
  pub site:             SiteConfig,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 3000 }

fn default_sitemap_ttl_secs() -> u64 { 3600 }

impl ServerConfig {
  /// `sitemap_ttl_secs` as a [`Duration`], saturating for values chrono
  /// cannot represent.
  pub fn sitemap_max_age(&self) -> Duration {
    i64::try_from(self.sitemap_ttl_secs)
      .ok()
      .and_then(Duration::try_seconds)
      .unwrap_or(Duration::MAX)
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ContentStore> {
  pub store:       Arc<S>,
  pub pages:       Arc<RenderCache>,
  /// Invalidates renderings. Normally the same cache as `pages`.
  pub revalidator: Arc<dyn Revalidator>,
  pub config:      Arc<ServerConfig>,
}

impl<S: ContentStore> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Self {
    let pages = Arc::new(RenderCache::new());
    Self {
      store:       Arc::new(store),
      revalidator: pages.clone(),
      pages,
      config:      Arc::new(config),
    }
  }

  /// Route revalidation to something other than the local render cache.
  pub fn with_revalidator(mut self, revalidator: Arc<dyn Revalidator>) -> Self {
    self.revalidator = revalidator;
    self
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the site's axum [`Router`]. Listing and article routes hang off the
/// configured listing path.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let site = &state.config.site;
  let listing = site.listing_root().to_string();
  let listing_all = site.listing_all_path();
  let category = site.category_path("{category}");
  let article = site.article_path("{slug}");

  Router::new()
    // Pages
    .route("/", get(pages::home::<S>))
    .route(&listing, get(pages::listing::<S>))
    .route(&listing_all, get(pages::listing_all::<S>))
    .route(&category, get(pages::category::<S>))
    .route(&article, get(pages::article::<S>))
    // Crawlers
    .route(sitemap::SITEMAP_PATH, get(handlers::sitemap::xml::<S>))
    .route("/robots.txt", get(robots_handler::handler::<S>))
    // API
    .route("/api/sitemap", get(handlers::sitemap::json::<S>))
    .route("/api/revalidate", post(revalidate::handler::<S>))
    .route("/api/structured-data/{slug}", get(structured_data::handler::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
