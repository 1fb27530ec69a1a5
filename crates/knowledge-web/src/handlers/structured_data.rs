//! `GET /api/structured-data/{slug}` — the JSON-LD documents of one article.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::Utc;
use knowledge_core::store::ContentStore;
use knowledge_jsonld::{SchemaKind, generate, generate_all};
use serde::Deserialize;
use serde_json::Value;

use crate::{AppState, error::ApiError, handlers::store_error};

#[derive(Debug, Deserialize)]
pub struct Params {
  /// One of `article`, `breadcrumb`, `faq`, `howto`, `organization`.
  #[serde(rename = "type")]
  pub kind: Option<String>,
}

/// Without `type`: every applicable document. With `type`: that document,
/// or `null` when the article does not qualify for it.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Path(slug): Path<String>,
  Query(params): Query<Params>,
) -> Result<Json<Value>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let kind = params.kind.as_deref().map(SchemaKind::parse).transpose()?;

  let article = state
    .store
    .get_published(&slug)
    .await
    .map_err(store_error)?
    .ok_or_else(|| ApiError::NotFound(format!("no published article {slug:?}")))?;

  let site = &state.config.site;
  let now = Utc::now();
  let value = match kind {
    Some(kind) => serde_json::to_value(generate(kind, &article, site, now)),
    None => serde_json::to_value(generate_all(&article, site, now)),
  }
  .map_err(|e| ApiError::Render(e.to_string()))?;

  Ok(Json(value))
}
