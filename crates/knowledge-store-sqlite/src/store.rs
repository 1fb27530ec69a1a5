//! [`SqliteStore`] — the SQLite implementation of [`ContentStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, TransactionBehavior};

use knowledge_core::{
  article::{Article, ArticleStatus},
  store::ContentStore,
};

use crate::{
  Error, Result,
  encode::{ARTICLE_COLUMNS, RawArticle, encode_article, encode_status},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A content store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert `article`, or replace the stored copy with the same
  /// `article_id`.
  ///
  /// This is the authoring side of the store, used by import tooling and
  /// tests; the web layer only ever reads. Publishing a slug that another
  /// published article already owns fails with [`Error::SlugTaken`].
  pub async fn upsert_article(&self, article: &Article) -> Result<()> {
    let row = encode_article(article)?;
    let publishing = article.status == ArticleStatus::Published;

    tracing::debug!(slug = %article.slug, status = %article.status, "upserting article");

    // The slug check and the write share one immediate transaction.
    let written: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if publishing {
          let taken = tx
            .query_row(
              "SELECT 1 FROM articles
               WHERE slug = ?1 AND status = 'published' AND article_id != ?2",
              rusqlite::params![row.slug, row.article_id],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
          if taken {
            return Ok(false);
          }
        }

        tx.execute(
          "INSERT INTO articles (
             article_id, slug, title, description, category, tags,
             date_published, date_modified, date_created, published_sort,
             author, featured_image, status, word_count, reading_time,
             keywords, faqs, content
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                     ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
           ON CONFLICT(article_id) DO UPDATE SET
             slug           = excluded.slug,
             title          = excluded.title,
             description    = excluded.description,
             category       = excluded.category,
             tags           = excluded.tags,
             date_published = excluded.date_published,
             date_modified  = excluded.date_modified,
             date_created   = excluded.date_created,
             published_sort = excluded.published_sort,
             author         = excluded.author,
             featured_image = excluded.featured_image,
             status         = excluded.status,
             word_count     = excluded.word_count,
             reading_time   = excluded.reading_time,
             keywords       = excluded.keywords,
             faqs           = excluded.faqs,
             content        = excluded.content",
          rusqlite::params![
            row.article_id,
            row.slug,
            row.title,
            row.description,
            row.category,
            row.tags,
            row.date_published,
            row.date_modified,
            row.date_created,
            row.published_sort,
            row.author,
            row.featured_image,
            row.status,
            row.word_count,
            row.reading_time,
            row.keywords,
            row.faqs,
            row.content,
          ],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !written {
      return Err(Error::SlugTaken(article.slug.clone()));
    }
    Ok(())
  }

  /// Every article regardless of status, newest publication first.
  pub async fn list_all(&self) -> Result<Vec<Article>> {
    let raws: Vec<RawArticle> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ARTICLE_COLUMNS} FROM articles
           ORDER BY published_sort DESC, slug ASC"
        ))?;
        let rows = stmt
          .query_map([], RawArticle::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawArticle::into_article).collect()
  }
}

// ─── ContentStore impl ───────────────────────────────────────────────────────

impl ContentStore for SqliteStore {
  type Error = Error;

  async fn list_published(&self) -> Result<Vec<Article>> {
    let status = encode_status(ArticleStatus::Published);

    let raws: Vec<RawArticle> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ARTICLE_COLUMNS} FROM articles
           WHERE status = ?1
           ORDER BY published_sort DESC, slug ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![status], RawArticle::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawArticle::into_article).collect()
  }

  async fn get_published(&self, slug: &str) -> Result<Option<Article>> {
    let status = encode_status(ArticleStatus::Published);
    let slug = slug.to_owned();

    let raw: Option<RawArticle> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ARTICLE_COLUMNS} FROM articles
                 WHERE slug = ?1 AND status = ?2"
              ),
              rusqlite::params![slug, status],
              RawArticle::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawArticle::into_article).transpose()
  }
}
