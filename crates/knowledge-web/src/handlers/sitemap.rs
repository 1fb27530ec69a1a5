//! `GET /sitemap.xml` and `GET /api/sitemap`.

use axum::{
  Json,
  extract::State,
  http::HeaderMap,
  response::Response,
};
use chrono::Utc;
use knowledge_core::{sitemap::SitemapEntry, store::ContentStore};

use crate::{
  AppState,
  error::ApiError,
  handlers::page_response,
  sitemap::{SITEMAP_PATH, build_sitemap, refresh},
};

/// Served from the render cache while younger than `sitemap_ttl_secs`.
pub async fn xml<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let now = Utc::now();
  let page = match state.pages.get_fresh(SITEMAP_PATH, state.config.sitemap_max_age(), now) {
    Some(page) => page,
    None => refresh(&state, now).await?,
  };
  Ok(page_response(&page, &headers))
}

/// Always a fresh build.
pub async fn json<S>(State(state): State<AppState<S>>) -> Json<Vec<SitemapEntry>>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  Json(build_sitemap(state.store.as_ref(), &state.config.site, Utc::now()).await)
}
