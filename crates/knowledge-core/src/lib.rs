//! Core types and trait definitions for the knowledge site's metadata and
//! freshness pipeline.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! structured-data generator, the store backend and the web layer all depend
//! on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod article;
pub mod dates;
pub mod error;
pub mod revalidate;
pub mod sanitize;
pub mod site;
pub mod sitemap;
pub mod store;

pub use error::{Error, Result};
