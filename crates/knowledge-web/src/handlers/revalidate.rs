//! `POST /api/revalidate` — invalidate the renderings a content change
//! touched.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use chrono::Utc;
use knowledge_core::{
  dates,
  revalidate::{revalidation_paths, validate_slug},
  store::ContentStore,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RevalidateRequest {
  #[serde(default)]
  pub slug: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevalidateResponse {
  pub revalidated: bool,
  pub slug:        String,
  pub paths:       Vec<String>,
  pub timestamp:   String,
}

/// The store is never consulted: revalidating a slug that no longer exists
/// is how a deleted article disappears from the listings.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<RevalidateRequest>, JsonRejection>,
) -> Result<Json<RevalidateResponse>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let Json(request) = body?;
  let slug = validate_slug(request.slug.as_deref().unwrap_or_default())?;

  let paths = revalidation_paths(&state.config.site, slug);
  for path in &paths {
    state.revalidator.revalidate_path(path)?;
  }

  tracing::info!(slug, ?paths, "revalidated");

  Ok(Json(RevalidateResponse {
    revalidated: true,
    slug:        slug.to_string(),
    paths:       paths.into(),
    timestamp:   dates::format_iso(Utc::now()),
  }))
}
