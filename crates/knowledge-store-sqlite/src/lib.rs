//! SQLite backend for the knowledge content store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Implements the read-only
//! [`knowledge_core::store::ContentStore`] trait, plus an editor-side
//! [`SqliteStore::upsert_article`] used by import tooling.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
