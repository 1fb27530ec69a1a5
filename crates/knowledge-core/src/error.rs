//! Error types for `knowledge-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("slug is missing")]
  MissingSlug,

  #[error("slug is not URL-safe: {0:?}")]
  InvalidSlug(String),

  #[error("unknown article status: {0:?}")]
  UnknownStatus(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
