//! `knowledge` — operator tooling for the knowledge site.
//!
//! # Usage
//!
//! ```text
//! knowledge --url https://example.com revalidate ultimate-anmeldung-guide-germany
//! knowledge sitemap --xml
//! knowledge structured-data ultimate-anmeldung-guide-germany --type howto
//! knowledge import articles.json --store ~/knowledge.db --revalidate
//! ```

mod client;

use std::{
  collections::HashMap,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use client::ApiClient;
use knowledge_core::article::Article;
use knowledge_store_sqlite::SqliteStore;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:3000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "knowledge", about = "Operator tooling for the knowledge site")]
struct Args {
  /// Path to a TOML config file (url, store_path).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the knowledge server (default: http://localhost:3000).
  #[arg(long, env = "KNOWLEDGE_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Invalidate the cached pages for an article.
  Revalidate { slug: String },

  /// Print the sitemap the server currently builds.
  Sitemap {
    /// Print the raw XML instead of a table.
    #[arg(long)]
    xml: bool,
  },

  /// Print the JSON-LD documents for an article.
  StructuredData {
    slug: String,
    /// Only this schema type (article, breadcrumb, faq, howto, organization).
    #[arg(long = "type", value_name = "KIND")]
    kind: Option<String>,
  },

  /// Load articles from a JSON file (one object or an array) into the store.
  Import {
    file: PathBuf,
    /// SQLite store to write to.
    #[arg(long, env = "KNOWLEDGE_STORE")]
    store: Option<PathBuf>,
    /// Revalidate every imported slug on the server afterwards.
    #[arg(long)]
    revalidate: bool,
  },

  /// List every article in the store, drafts included.
  List {
    #[arg(long, env = "KNOWLEDGE_STORE")]
    store: Option<PathBuf>,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug)]
struct ConfigFile {
  #[serde(default)]
  url:        String,
  #[serde(default)]
  store_path: Option<PathBuf>,
}

/// Settings after merging flags over the config file over defaults.
#[derive(Debug, PartialEq)]
struct Resolved {
  url:        String,
  store_path: Option<PathBuf>,
}

fn resolve(url: Option<String>, store: Option<PathBuf>, file: ConfigFile) -> Resolved {
  Resolved {
    url:        url
      .or_else(|| (!file.url.is_empty()).then(|| file.url.clone()))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
    store_path: store.or(file.store_path),
  }
}

fn load_config(path: Option<&Path>) -> Result<ConfigFile> {
  let Some(path) = path else {
    return Ok(ConfigFile::default());
  };
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading config file {}", path.display()))?;
  toml::from_str(&raw).context("parsing config file")
}

// ─── Import ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportFile {
  Many(Vec<Article>),
  One(Box<Article>),
}

fn parse_import(raw: &str) -> Result<Vec<Article>> {
  let parsed: ImportFile = serde_json::from_str(raw).context("parsing article JSON")?;
  Ok(match parsed {
    ImportFile::Many(articles) => articles,
    ImportFile::One(article) => vec![*article],
  })
}

/// Upsert `articles`, keeping the id of an existing record with the same slug
/// so re-importing a file updates instead of duplicating.
async fn import(store: &SqliteStore, mut articles: Vec<Article>) -> Result<Vec<String>> {
  // A published record owns its slug; drafts only claim it when unopposed.
  let mut existing = HashMap::new();
  for a in store.list_all().await.context("reading existing articles")? {
    if a.is_published() {
      existing.insert(a.slug, a.article_id);
    } else {
      existing.entry(a.slug).or_insert(a.article_id);
    }
  }

  let mut slugs = Vec::with_capacity(articles.len());
  for article in &mut articles {
    if let Some(id) = existing.get(&article.slug) {
      article.article_id = *id;
    }
    store
      .upsert_article(article)
      .await
      .with_context(|| format!("importing {:?}", article.slug))?;
    tracing::info!(slug = %article.slug, status = %article.status, "imported");
    slugs.push(article.slug.clone());
  }
  Ok(slugs)
}

async fn open_store(path: Option<&Path>) -> Result<SqliteStore> {
  let Some(path) = path else {
    bail!("no store given; pass --store, set KNOWLEDGE_STORE or store_path in the config file");
  };
  SqliteStore::open(path)
    .await
    .with_context(|| format!("failed to open store at {}", path.display()))
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let file_cfg = load_config(args.config.as_deref())?;

  let store_flag = match &args.command {
    Command::Import { store, .. } | Command::List { store } => store.clone(),
    _ => None,
  };
  let settings = resolve(args.url, store_flag, file_cfg);
  let client = ApiClient::new(settings.url.clone())?;

  match args.command {
    Command::Revalidate { slug } => {
      let result = client.revalidate(&slug).await?;
      println!("revalidated {} at {}", result.slug, result.timestamp);
      for path in result.paths {
        println!("  {path}");
      }
    }
    Command::Sitemap { xml: true } => {
      print!("{}", client.sitemap_xml().await?);
    }
    Command::Sitemap { xml: false } => {
      for row in client.sitemap().await? {
        println!(
          "{:<4} {:<7} {}  {}",
          row.priority, row.change_frequency, row.last_modified, row.url
        );
      }
    }
    Command::StructuredData { slug, kind } => {
      let value = client.structured_data(&slug, kind.as_deref()).await?;
      println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Command::Import { file, revalidate, .. } => {
      let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
      let articles = parse_import(&raw)?;
      let store = open_store(settings.store_path.as_deref()).await?;
      let slugs = import(&store, articles).await?;
      println!("imported {} article(s)", slugs.len());

      if revalidate {
        for slug in &slugs {
          client.revalidate(slug).await?;
        }
        println!("revalidated {} slug(s)", slugs.len());
      }
    }
    Command::List { .. } => {
      let store = open_store(settings.store_path.as_deref()).await?;
      for article in store.list_all().await? {
        println!("{:<9} {:<40} {}", article.status, article.slug, article.title);
      }
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use knowledge_core::{article::ArticleStatus, store::ContentStore};

  use super::*;

  #[test]
  fn flags_override_file_override_defaults() {
    let file = ConfigFile {
      url:        "https://file.example".into(),
      store_path: Some("/var/file.db".into()),
    };
    let r = resolve(Some("https://flag.example".into()), None, file);
    assert_eq!(r.url, "https://flag.example");
    assert_eq!(r.store_path, Some(PathBuf::from("/var/file.db")));

    let r = resolve(None, None, ConfigFile::default());
    assert_eq!(r.url, DEFAULT_URL);
    assert_eq!(r.store_path, None);
  }

  #[test]
  fn config_file_is_toml() {
    let cfg: ConfigFile =
      toml::from_str("url = \"https://example.com\"\nstore_path = \"k.db\"").unwrap();
    assert_eq!(cfg.url, "https://example.com");
    assert_eq!(cfg.store_path, Some(PathBuf::from("k.db")));
  }

  #[test]
  fn import_accepts_object_or_array() {
    let one = parse_import(r#"{"slug":"a","title":"A","category":"Work"}"#).unwrap();
    assert_eq!(one.len(), 1);

    let many = parse_import(
      r#"[{"slug":"a","title":"A","category":"Work"},
          {"slug":"b","title":"B","category":"Housing","status":"published"}]"#,
    )
    .unwrap();
    assert_eq!(many.len(), 2);
    assert_eq!(many[1].status, ArticleStatus::Published);

    assert!(parse_import("[1, 2]").is_err());
  }

  #[tokio::test]
  async fn reimport_updates_in_place() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let raw = r#"{"slug":"a","title":"First","category":"Work","status":"published","datePublished":"2024-01-01"}"#;
    import(&store, parse_import(raw).unwrap()).await.unwrap();

    let raw = raw.replace("First", "Second");
    import(&store, parse_import(&raw).unwrap()).await.unwrap();

    let all = store.list_published().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "Second");
  }
}
