//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use knowledge_core::revalidate::RevalidateError;
use serde_json::json;
use thiserror::Error;

/// An error returned by a handler. Every variant renders as
/// `{"error": <code>, "message": <text>}`.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Slug(knowledge_core::Error),

  #[error(transparent)]
  Revalidation(#[from] RevalidateError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("render error: {0}")]
  Render(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) | ApiError::Slug(_) => StatusCode::BAD_REQUEST,
      ApiError::Revalidation(_) | ApiError::Store(_) | ApiError::Render(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  /// Stable machine-readable code for the `error` field.
  pub fn code(&self) -> &'static str {
    match self {
      ApiError::NotFound(_) => "not_found",
      ApiError::BadRequest(_) => "bad_request",
      ApiError::Slug(knowledge_core::Error::MissingSlug) => "missing_slug",
      ApiError::Slug(_) => "invalid_slug",
      ApiError::Revalidation(_) => "revalidation_failed",
      ApiError::Store(_) => "store_error",
      ApiError::Render(_) => "render_failed",
    }
  }
}

impl From<knowledge_core::Error> for ApiError {
  fn from(e: knowledge_core::Error) -> Self {
    match e {
      knowledge_core::Error::MissingSlug | knowledge_core::Error::InvalidSlug(_) => {
        ApiError::Slug(e)
      }
      other => ApiError::Render(other.to_string()),
    }
  }
}

impl From<knowledge_jsonld::Error> for ApiError {
  fn from(e: knowledge_jsonld::Error) -> Self {
    match e {
      knowledge_jsonld::Error::UnknownSchemaKind(_) => {
        ApiError::BadRequest(e.to_string())
      }
      knowledge_jsonld::Error::Json(e) => ApiError::Render(e.to_string()),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    let body = json!({ "error": self.code(), "message": self.to_string() });
    (status, Json(body)).into_response()
  }
}
