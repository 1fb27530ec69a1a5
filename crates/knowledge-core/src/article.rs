//! Article types — the content records the site publishes.
//!
//! Articles are owned by the document store. Nothing in this workspace's
//! request path mutates them; every other artifact (structured data, sitemap
//! entries, cached renderings) is derived from them on read.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

/// Words per minute used when a reading time has to be estimated.
pub const WORDS_PER_MINUTE: usize = 200;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Publication state. Only `Published` articles are externally discoverable.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ArticleStatus {
  #[default]
  Draft,
  Published,
}

// ─── Category ────────────────────────────────────────────────────────────────

/// The section an article belongs to. Open-ended: names that are not one of
/// the well-known sections are kept verbatim in [`Category::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
#[strum(ascii_case_insensitive)]
pub enum Category {
  Bureaucracy,
  Finance,
  Housing,
  Work,
  Health,
  Language,
  Culture,
  Travel,
  #[strum(default)]
  Other(String),
}

impl Category {
  /// Human-readable section name.
  pub fn name(&self) -> &str {
    match self {
      Self::Bureaucracy => "Bureaucracy",
      Self::Finance => "Finance",
      Self::Housing => "Housing",
      Self::Work => "Work",
      Self::Health => "Health",
      Self::Language => "Language",
      Self::Culture => "Culture",
      Self::Travel => "Travel",
      Self::Other(name) => name,
    }
  }

  /// URL segment for the category, e.g. `"Expat Life"` → `"expat-life"`.
  pub fn slug(&self) -> String {
    self
      .name()
      .split_whitespace()
      .map(str::to_lowercase)
      .collect::<Vec<_>>()
      .join("-")
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl From<String> for Category {
  fn from(s: String) -> Self {
    Category::from_str(s.trim()).unwrap_or(Category::Other(s))
  }
}

impl From<Category> for String {
  fn from(c: Category) -> Self { c.name().to_owned() }
}

// ─── Author ──────────────────────────────────────────────────────────────────

/// Who wrote an article: a plain byline or a reference to an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
  Person(String),
  Organization {
    name: String,
    #[serde(default)]
    url:  Option<String>,
  },
}

// ─── Dates ───────────────────────────────────────────────────────────────────

/// A date as the store hands it back: either a native timestamp or whatever
/// string an editor or an import script wrote. See [`crate::dates`] for the
/// single place these are normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
  Timestamp(DateTime<Utc>),
  Text(String),
}

impl From<DateTime<Utc>> for DateValue {
  fn from(dt: DateTime<Utc>) -> Self { Self::Timestamp(dt) }
}

impl From<&str> for DateValue {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

// ─── FAQ ─────────────────────────────────────────────────────────────────────

/// A question/answer pair shown at the bottom of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
  pub question: String,
  pub answer:   String,
}

// ─── Article ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
  /// Generated when absent so hand-written import files may omit it.
  #[serde(default = "Uuid::new_v4")]
  pub article_id:     Uuid,
  /// Sole external routing key; unique among published articles.
  pub slug:           String,
  pub title:          String,
  #[serde(default)]
  pub description:    String,
  pub category:       Category,
  #[serde(default)]
  pub tags:           Vec<String>,
  #[serde(default)]
  pub date_published: Option<DateValue>,
  #[serde(default)]
  pub date_modified:  Option<DateValue>,
  #[serde(default)]
  pub date_created:   Option<DateValue>,
  #[serde(default)]
  pub author:         Option<Author>,
  #[serde(default)]
  pub featured_image: Option<String>,
  #[serde(default)]
  pub status:         ArticleStatus,
  #[serde(default)]
  pub word_count:     Option<u32>,
  /// Human-readable estimate, e.g. `"6 min read"`.
  #[serde(default)]
  pub reading_time:   Option<String>,
  #[serde(default)]
  pub keywords:       Vec<String>,
  #[serde(default)]
  pub faqs:           Vec<Faq>,
  /// Markdown body.
  #[serde(default)]
  pub content:        Option<String>,
}

impl Article {
  /// A draft with a fresh id and every optional field empty.
  pub fn new(
    slug: impl Into<String>,
    title: impl Into<String>,
    category: Category,
  ) -> Self {
    Self {
      article_id: Uuid::new_v4(),
      slug: slug.into(),
      title: title.into(),
      description: String::new(),
      category,
      tags: Vec::new(),
      date_published: None,
      date_modified: None,
      date_created: None,
      author: None,
      featured_image: None,
      status: ArticleStatus::Draft,
      word_count: None,
      reading_time: None,
      keywords: Vec::new(),
      faqs: Vec::new(),
      content: None,
    }
  }

  pub fn is_published(&self) -> bool {
    self.status == ArticleStatus::Published
  }

  /// The stored word count, or one counted from the body.
  pub fn effective_word_count(&self) -> Option<u32> {
    self.word_count.or_else(|| {
      self
        .content
        .as_deref()
        .map(|c| c.split_whitespace().count() as u32)
        .filter(|n| *n > 0)
    })
  }

  /// Reading time in whole minutes: parsed from the stored string when it
  /// starts with a number, otherwise estimated from the word count.
  pub fn reading_minutes(&self) -> Option<u32> {
    let stored = self.reading_time.as_deref().and_then(|s| {
      let digits: String =
        s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
      digits.parse::<u32>().ok()
    });
    stored.or_else(|| {
      self
        .effective_word_count()
        .map(|words| (words as usize).div_ceil(WORDS_PER_MINUTE).max(1) as u32)
    })
  }

  /// Human-readable reading time, e.g. `"6 min read"`.
  pub fn effective_reading_time(&self) -> Option<String> {
    self
      .reading_time
      .clone()
      .or_else(|| self.reading_minutes().map(|m| format!("{m} min read")))
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn category_parses_case_insensitively() {
    assert_eq!(Category::from("bureaucracy".to_string()), Category::Bureaucracy);
    assert_eq!(Category::from("HOUSING".to_string()), Category::Housing);
  }

  #[test]
  fn unknown_category_is_kept_verbatim() {
    let c = Category::from("Expat Life".to_string());
    assert_eq!(c, Category::Other("Expat Life".into()));
    assert_eq!(c.to_string(), "Expat Life");
    assert_eq!(c.slug(), "expat-life");
  }

  #[test]
  fn category_serializes_as_plain_string() {
    let json = serde_json::to_string(&Category::Finance).unwrap();
    assert_eq!(json, "\"Finance\"");
  }

  #[test]
  fn status_round_trips_lowercase() {
    assert_eq!(ArticleStatus::Published.to_string(), "published");
    assert_eq!(
      "draft".parse::<ArticleStatus>().unwrap(),
      ArticleStatus::Draft
    );
  }

  #[test]
  fn date_value_accepts_timestamp_and_text() {
    let ts: DateValue =
      serde_json::from_str("\"2024-01-10T08:30:00Z\"").unwrap();
    assert!(matches!(ts, DateValue::Timestamp(_)));

    let text: DateValue = serde_json::from_str("\"2024-01-10\"").unwrap();
    assert_eq!(text, DateValue::Text("2024-01-10".into()));
  }

  #[test]
  fn author_accepts_string_or_organization() {
    let person: Author = serde_json::from_str("\"Anna Schmidt\"").unwrap();
    assert_eq!(person, Author::Person("Anna Schmidt".into()));

    let org: Author =
      serde_json::from_str(r#"{"name":"Expat Desk"}"#).unwrap();
    assert_eq!(
      org,
      Author::Organization { name: "Expat Desk".into(), url: None }
    );
  }

  #[test]
  fn reading_time_is_estimated_from_content() {
    let mut a = Article::new("a", "A", Category::Work);
    a.content = Some("word ".repeat(450));
    assert_eq!(a.effective_word_count(), Some(450));
    assert_eq!(a.reading_minutes(), Some(3));
    assert_eq!(a.effective_reading_time().as_deref(), Some("3 min read"));
  }

  #[test]
  fn stored_reading_time_wins() {
    let mut a = Article::new("a", "A", Category::Work);
    a.reading_time = Some("12 min read".into());
    a.content = Some("short".into());
    assert_eq!(a.reading_minutes(), Some(12));
    assert_eq!(a.effective_reading_time().as_deref(), Some("12 min read"));
  }

  #[test]
  fn article_json_uses_camel_case() {
    let json = r#"{
      "articleId": "6f1c8a1e-9a55-4a43-b1a2-0d6c5d0f7f11",
      "slug": "ultimate-anmeldung-guide-germany",
      "title": "Ultimate Anmeldung Guide",
      "category": "Bureaucracy",
      "datePublished": "2024-01-10",
      "status": "published"
    }"#;
    let a: Article = serde_json::from_str(json).unwrap();
    assert!(a.is_published());
    assert_eq!(a.category, Category::Bureaucracy);
    assert_eq!(a.date_published, Some(DateValue::Text("2024-01-10".into())));
    assert!(a.faqs.is_empty());
  }

  #[test]
  fn missing_id_is_generated() {
    let json = r#"{"slug": "a", "title": "A", "category": "Work"}"#;
    let a: Article = serde_json::from_str(json).unwrap();
    let b: Article = serde_json::from_str(json).unwrap();
    assert_ne!(a.article_id, b.article_id);
    assert_eq!(a.status, ArticleStatus::Draft);
  }
}
