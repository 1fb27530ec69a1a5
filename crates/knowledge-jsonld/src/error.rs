//! Error types for the knowledge-jsonld generator.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown schema type: {0:?}")]
  UnknownSchemaKind(String),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
