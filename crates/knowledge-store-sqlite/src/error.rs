//! Error type for `knowledge-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] knowledge_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A stored column could not be mapped back onto the domain type.
  #[error("decode error in {column}: {message}")]
  Decode { column: &'static str, message: String },

  /// Another published article already owns this slug.
  #[error("slug already published: {0}")]
  SlugTaken(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
