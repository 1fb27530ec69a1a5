//! Encoding and decoding helpers between [`Article`] and the plain-text
//! representations stored in SQLite columns.
//!
//! Structured fields (dates, author, tags, keywords, FAQs) are stored as
//! compact JSON so the original date shape survives a round trip. UUIDs are
//! stored as hyphenated lowercase strings.

use std::str::FromStr as _;

use chrono::{DateTime, SecondsFormat, Utc};
use knowledge_core::{
  article::{Article, ArticleStatus, Author, Category, DateValue, Faq},
  dates,
};
use uuid::Uuid;

use crate::{Error, Result};

/// Column list shared by every `SELECT`; order matches [`RawArticle::from_row`].
pub const ARTICLE_COLUMNS: &str = "
  article_id, slug, title, description, category, tags,
  date_published, date_modified, date_created, author, featured_image,
  status, word_count, reading_time, keywords, faqs, content";

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

/// Fixed-width so lexical order in SQL is chronological order.
pub fn encode_sort_key(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn encode_status(s: ArticleStatus) -> &'static str { s.into() }

pub fn decode_status(s: &str) -> Result<ArticleStatus> {
  ArticleStatus::from_str(s)
    .map_err(|_| Error::Core(knowledge_core::Error::UnknownStatus(s.to_string())))
}

// ─── JSON columns ────────────────────────────────────────────────────────────

fn encode_json_opt<T: serde::Serialize>(v: Option<&T>) -> Result<Option<String>> {
  v.map(serde_json::to_string).transpose().map_err(Error::from)
}

fn decode_json_opt<T: serde::de::DeserializeOwned>(
  s: Option<&str>,
) -> Result<Option<T>> {
  s.map(serde_json::from_str).transpose().map_err(Error::from)
}

fn decode_json_list<T: serde::de::DeserializeOwned>(
  column: &'static str,
  s: &str,
) -> Result<Vec<T>> {
  serde_json::from_str(s).map_err(|e| Error::Decode {
    column,
    message: e.to_string(),
  })
}

// ─── Article → row ───────────────────────────────────────────────────────────

/// Column values for one `INSERT`, owned so they can move into the
/// connection closure.
pub struct EncodedArticle {
  pub article_id:     String,
  pub slug:           String,
  pub title:          String,
  pub description:    String,
  pub category:       String,
  pub tags:           String,
  pub date_published: Option<String>,
  pub date_modified:  Option<String>,
  pub date_created:   Option<String>,
  pub published_sort: String,
  pub author:         Option<String>,
  pub featured_image: Option<String>,
  pub status:         &'static str,
  pub word_count:     Option<i64>,
  pub reading_time:   Option<String>,
  pub keywords:       String,
  pub faqs:           String,
  pub content:        Option<String>,
}

pub fn encode_article(a: &Article) -> Result<EncodedArticle> {
  let published_sort = a
    .date_published
    .as_ref()
    .and_then(dates::parse)
    .or_else(|| a.date_created.as_ref().and_then(dates::parse))
    .map(encode_sort_key)
    .unwrap_or_default();

  Ok(EncodedArticle {
    article_id: encode_uuid(a.article_id),
    slug: a.slug.clone(),
    title: a.title.clone(),
    description: a.description.clone(),
    category: a.category.name().to_owned(),
    tags: serde_json::to_string(&a.tags)?,
    date_published: encode_json_opt(a.date_published.as_ref())?,
    date_modified: encode_json_opt(a.date_modified.as_ref())?,
    date_created: encode_json_opt(a.date_created.as_ref())?,
    published_sort,
    author: encode_json_opt(a.author.as_ref())?,
    featured_image: a.featured_image.clone(),
    status: encode_status(a.status),
    word_count: a.word_count.map(i64::from),
    reading_time: a.reading_time.clone(),
    keywords: serde_json::to_string(&a.keywords)?,
    faqs: serde_json::to_string(&a.faqs)?,
    content: a.content.clone(),
  })
}

// ─── Row → Article ───────────────────────────────────────────────────────────

/// Raw row data as read from SQLite, before domain decoding.
pub struct RawArticle {
  pub article_id:     String,
  pub slug:           String,
  pub title:          String,
  pub description:    String,
  pub category:       String,
  pub tags:           String,
  pub date_published: Option<String>,
  pub date_modified:  Option<String>,
  pub date_created:   Option<String>,
  pub author:         Option<String>,
  pub featured_image: Option<String>,
  pub status:         String,
  pub word_count:     Option<i64>,
  pub reading_time:   Option<String>,
  pub keywords:       String,
  pub faqs:           String,
  pub content:        Option<String>,
}

impl RawArticle {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      article_id:     row.get(0)?,
      slug:           row.get(1)?,
      title:          row.get(2)?,
      description:    row.get(3)?,
      category:       row.get(4)?,
      tags:           row.get(5)?,
      date_published: row.get(6)?,
      date_modified:  row.get(7)?,
      date_created:   row.get(8)?,
      author:         row.get(9)?,
      featured_image: row.get(10)?,
      status:         row.get(11)?,
      word_count:     row.get(12)?,
      reading_time:   row.get(13)?,
      keywords:       row.get(14)?,
      faqs:           row.get(15)?,
      content:        row.get(16)?,
    })
  }

  pub fn into_article(self) -> Result<Article> {
    let word_count = self
      .word_count
      .map(u32::try_from)
      .transpose()
      .map_err(|e| Error::Decode {
        column:  "word_count",
        message: e.to_string(),
      })?;

    Ok(Article {
      article_id: decode_uuid(&self.article_id)?,
      slug: self.slug,
      title: self.title,
      description: self.description,
      category: Category::from(self.category),
      tags: decode_json_list("tags", &self.tags)?,
      date_published: decode_json_opt::<DateValue>(self.date_published.as_deref())?,
      date_modified: decode_json_opt::<DateValue>(self.date_modified.as_deref())?,
      date_created: decode_json_opt::<DateValue>(self.date_created.as_deref())?,
      author: decode_json_opt::<Author>(self.author.as_deref())?,
      featured_image: self.featured_image,
      status: decode_status(&self.status)?,
      word_count,
      reading_time: self.reading_time,
      keywords: decode_json_list("keywords", &self.keywords)?,
      faqs: decode_json_list::<Faq>("faqs", &self.faqs)?,
      content: self.content,
    })
  }
}
