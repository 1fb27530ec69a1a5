//! Public HTML pages. Home, listings and article pages are served from the
//! render cache; category listings are rendered per request since nothing
//! revalidates them.

use axum::{
  extract::{Path, State},
  http::HeaderMap,
  response::Response,
};
use chrono::Utc;
use knowledge_core::store::ContentStore;
use knowledge_jsonld::Crumb;

use crate::{
  AppState,
  error::ApiError,
  handlers::{cached_page, html_page, page_response, store_error},
  html,
};

/// How many of the newest articles the listing root shows.
pub const LATEST_COUNT: usize = 12;

pub async fn home<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  cached_page(&state, "/", &headers, || async {
    Ok::<_, ApiError>(Some(html_page(html::home(&state.config.site)?)))
  })
  .await
}

pub async fn listing<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let site = &state.config.site;
  let path = site.listing_root();
  cached_page(&state, path, &headers, || async {
    let mut articles = state.store.list_published().await.map_err(store_error)?;
    articles.truncate(LATEST_COUNT);
    let body = html::listing(site, &site.listing_title, path, &[], &articles)?;
    Ok::<_, ApiError>(Some(html_page(body)))
  })
  .await
}

pub async fn listing_all<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let site = &state.config.site;
  let path = site.listing_all_path();
  cached_page(&state, &path, &headers, || async {
    let articles = state.store.list_published().await.map_err(store_error)?;
    let title = format!("All {}", site.listing_title.to_lowercase());
    let trail = [Crumb::new(title.clone(), path.clone())];
    let body = html::listing(site, &title, &path, &trail, &articles)?;
    Ok::<_, ApiError>(Some(html_page(body)))
  })
  .await
}

pub async fn category<S>(
  State(state): State<AppState<S>>,
  Path(category): Path<String>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let site = &state.config.site;
  let articles: Vec<_> = state
    .store
    .list_published()
    .await
    .map_err(store_error)?
    .into_iter()
    .filter(|a| a.category.slug() == category)
    .collect();

  let Some(name) = articles.first().map(|a| a.category.name().to_string()) else {
    return Err(ApiError::NotFound(format!("no articles in category {category:?}")));
  };

  let path = site.category_path(&category);
  let trail = [Crumb::new(name.clone(), path.clone())];
  let body = html::listing(site, &name, &path, &trail, &articles)?;
  Ok(page_response(&html_page(body), &headers))
}

pub async fn article<S>(
  State(state): State<AppState<S>>,
  Path(slug): Path<String>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let site = &state.config.site;
  let path = site.article_path(&slug);
  cached_page(&state, &path, &headers, || async {
    let Some(article) = state.store.get_published(&slug).await.map_err(store_error)?
    else {
      return Ok(None);
    };
    Ok::<_, ApiError>(Some(html_page(html::article(site, &article, Utc::now())?)))
  })
  .await
}
