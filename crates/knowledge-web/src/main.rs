//! knowledge-web server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), layers
//! `KNOWLEDGE__*` environment variables on top, opens the SQLite content
//! store and serves the site over HTTP.
//!
//! ```text
//! KNOWLEDGE__PORT=8080 KNOWLEDGE__SITE__BASE_URL=https://example.com server
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use knowledge_store_sqlite::SqliteStore;
use knowledge_web::{AppState, ServerConfig, sitemap};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Knowledge site server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml", env = "KNOWLEDGE_CONFIG")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("KNOWLEDGE")
        .prefix_separator("__")
        .separator("__"),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let state = AppState::new(store, server_cfg);

  // The first tick fires immediately, so the sitemap is warm before the
  // first crawler arrives.
  sitemap::spawn_refresher(state.clone());

  let app = knowledge_web::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
