use axum::{
  extract::State,
  http::header,
  response::IntoResponse,
};
use knowledge_core::store::ContentStore;

use crate::{AppState, robots::robots_txt};

pub async fn handler<S>(State(state): State<AppState<S>>) -> impl IntoResponse
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  (
    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
    robots_txt(&state.config.site),
  )
}
