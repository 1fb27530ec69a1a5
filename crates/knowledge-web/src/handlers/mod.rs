pub mod pages;
pub mod revalidate;
pub mod robots;
pub mod sitemap;
pub mod structured_data;

use std::{future::Future, sync::Arc};

use axum::{
  body::Body,
  http::{HeaderMap, HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use chrono::Utc;
use knowledge_core::store::ContentStore;

use crate::{
  AppState,
  cache::CachedPage,
  error::ApiError,
  etag::if_none_match,
};

/// Serve a cached rendering, answering `If-None-Match` with 304.
pub(crate) fn page_response(page: &CachedPage, headers: &HeaderMap) -> Response {
  let not_modified = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| if_none_match(v, &page.etag));

  let etag = match HeaderValue::from_str(&page.etag) {
    Ok(v) => v,
    Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
  };

  if not_modified {
    return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response();
  }

  (
    StatusCode::OK,
    [
      (header::CONTENT_TYPE, HeaderValue::from_static(page.content_type)),
      (header::ETAG, etag),
    ],
    Body::from(page.body.clone()),
  )
    .into_response()
}

/// Look `path` up in the render cache, rendering and storing it on a miss.
///
/// `render` yields `None` when the page does not exist; misses for missing
/// pages are not cached. A rendering that a revalidation overtook is served
/// once but not stored.
pub(crate) async fn cached_page<S, F, Fut>(
  state: &AppState<S>,
  path: &str,
  headers: &HeaderMap,
  render: F,
) -> Result<Response, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
  F: FnOnce() -> Fut,
  Fut: Future<Output = Result<Option<CachedPage>, ApiError>>,
{
  if let Some(page) = state.pages.get(path) {
    tracing::debug!(path, "render cache hit");
    return Ok(page_response(&page, headers));
  }

  tracing::debug!(path, "render cache miss");
  let generation = state.pages.generation(path);
  let page: Arc<CachedPage> = match render().await? {
    Some(page) => state.pages.insert_if_current(path, page, generation),
    None => return Err(ApiError::NotFound(path.to_string())),
  };
  Ok(page_response(&page, headers))
}

pub(crate) fn store_error<E>(e: E) -> ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  ApiError::Store(Box::new(e))
}

pub(crate) fn html_page(body: String) -> CachedPage {
  CachedPage::new(body, crate::html::CONTENT_TYPE_HTML, Utc::now())
}
