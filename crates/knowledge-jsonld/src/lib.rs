//! schema.org (JSON-LD) generator for knowledge articles.
//!
//! Maps an [`Article`] plus the fixed [`SiteConfig`] to structured-data
//! documents. Pure and synchronous; no HTTP or database dependencies, so it is
//! safe to call from any number of concurrent renders.
//!
//! # Quick start
//!
//! ```no_run
//! use knowledge_jsonld::{SchemaKind, generate, script_tag};
//! # fn demo(article: &knowledge_core::article::Article, site: &knowledge_core::site::SiteConfig) {
//! if let Some(doc) = generate(SchemaKind::Faq, article, site, chrono::Utc::now()) {
//!   println!("{}", script_tag(&doc).unwrap());
//! }
//! # }
//! ```

mod build;
pub mod error;
pub mod schema;

use chrono::{DateTime, Utc};
use knowledge_core::{article::Article, site::SiteConfig};
use strum::{Display, EnumString, IntoStaticStr};

pub use build::{
  Crumb, article_trail, breadcrumb_list, heading_anchor, is_how_to, organization,
};
pub use error::{Error, Result};
pub use schema::StructuredData;

// ─── Schema kinds ────────────────────────────────────────────────────────────

/// The document types a page can ask for.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SchemaKind {
  Article,
  Breadcrumb,
  Faq,
  HowTo,
  Organization,
}

impl SchemaKind {
  /// Every kind, in the order documents are emitted on a page.
  pub const ALL: [SchemaKind; 5] = [
    SchemaKind::Article,
    SchemaKind::Breadcrumb,
    SchemaKind::Faq,
    SchemaKind::HowTo,
    SchemaKind::Organization,
  ];

  pub fn parse(s: &str) -> Result<Self> {
    s.parse()
      .map_err(|_| Error::UnknownSchemaKind(s.to_string()))
  }
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Build the document of `kind` for `article`.
///
/// Returns `None` when the kind's preconditions are not met: an FAQ with no
/// usable entries, or a HowTo for an article that [`is_how_to`] rejects.
pub fn generate(
  kind: SchemaKind,
  article: &Article,
  site: &SiteConfig,
  now: DateTime<Utc>,
) -> Option<StructuredData> {
  match kind {
    SchemaKind::Article => {
      Some(StructuredData::Article(build::article(article, site, now)))
    }
    SchemaKind::Breadcrumb => Some(StructuredData::BreadcrumbList(
      breadcrumb_list(site, &article_trail(site, article)),
    )),
    SchemaKind::Faq => build::faq_page(article).map(StructuredData::FaqPage),
    SchemaKind::HowTo => build::how_to(article, site).map(StructuredData::HowTo),
    SchemaKind::Organization => {
      Some(StructuredData::Organization(organization(site)))
    }
  }
}

/// Every applicable document for an article page, in [`SchemaKind::ALL`]
/// order.
pub fn generate_all(
  article: &Article,
  site: &SiteConfig,
  now: DateTime<Utc>,
) -> Vec<StructuredData> {
  SchemaKind::ALL
    .iter()
    .filter_map(|kind| generate(*kind, article, site, now))
    .collect()
}

/// Serialise `doc` into a `<script type="application/ld+json">` element.
///
/// `</` is escaped so no embedded string can terminate the script early.
pub fn script_tag(doc: &StructuredData) -> Result<String> {
  let json = serde_json::to_string(doc)?.replace("</", "<\\/");
  Ok(format!(r#"<script type="application/ld+json">{json}</script>"#))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use knowledge_core::article::{
    ArticleStatus, Author, Category, DateValue, Faq,
  };
  use serde_json::Value;

  use super::*;

  fn site() -> SiteConfig {
    SiteConfig {
      base_url:                 "https://example.com".into(),
      site_name:                "Example Knowledge".into(),
      organization_name:        "Example GmbH".into(),
      organization_logo:        "/logo.png".into(),
      organization_description: Some("Guides for\nnewcomers".into()),
      same_as:                  vec!["https://social.example/@example".into()],
      default_image:            "/og-default.png".into(),
      listing_path:             "/knowledge".into(),
      listing_title:            "Knowledge".into(),
      language:                 "en".into(),
    }
  }

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
  }

  fn anmeldung() -> Article {
    let mut a = Article::new(
      "ultimate-anmeldung-guide-germany",
      "Ultimate Anmeldung Guide",
      Category::Bureaucracy,
    );
    a.status = ArticleStatus::Published;
    a.date_published = Some("2024-01-10".into());
    a
  }

  fn to_json(doc: &StructuredData) -> Value {
    serde_json::to_value(doc).unwrap()
  }

  // ── Article ─────────────────────────────────────────────────────────────────

  #[test]
  fn article_document_shape() {
    let mut a = anmeldung();
    a.description = "Register <em>your</em> address.".into();
    a.author = Some(Author::Person("Anna Schmidt".into()));
    a.tags = vec!["anmeldung".into(), "berlin".into()];
    a.reading_time = Some("7 min read".into());

    let doc = generate(SchemaKind::Article, &a, &site(), now()).unwrap();
    let v = to_json(&doc);
    assert_eq!(v["@context"], "https://schema.org");
    assert_eq!(v["@type"], "Article");
    assert_eq!(v["headline"], "Ultimate Anmeldung Guide");
    assert_eq!(v["description"], "Register your address.");
    assert_eq!(v["image"]["url"], "https://example.com/og-default.png");
    assert_eq!(v["datePublished"], "2024-01-10T00:00:00.000Z");
    assert_eq!(v["dateModified"], "2024-01-10T00:00:00.000Z");
    assert_eq!(v["author"]["@type"], "Person");
    assert_eq!(v["author"]["name"], "Anna Schmidt");
    assert_eq!(v["publisher"]["logo"]["url"], "https://example.com/logo.png");
    assert_eq!(
      v["mainEntityOfPage"]["@id"],
      "https://example.com/knowledge/ultimate-anmeldung-guide-germany"
    );
    assert_eq!(v["articleSection"], "Bureaucracy");
    assert_eq!(v["keywords"], "anmeldung, berlin");
    assert_eq!(v["timeRequired"], "PT7M");
    assert_eq!(v["inLanguage"], "en");
  }

  #[test]
  fn article_without_author_credits_the_organization() {
    let v = to_json(&generate(SchemaKind::Article, &anmeldung(), &site(), now()).unwrap());
    assert_eq!(v["author"]["@type"], "Organization");
    assert_eq!(v["author"]["name"], "Example GmbH");
    assert!(v.get("keywords").is_none());
    assert!(v.get("description").is_none());
  }

  #[test]
  fn date_modified_is_never_before_date_published() {
    let cases = [
      (Some("2024-01-10"), Some("2024-03-01")),
      (Some("2024-03-01"), Some("2024-01-10")),
      (Some("2024-01-10"), None),
      (Some("2024-01-10"), Some("garbage")),
      (None, Some("2024-01-10")),
    ];
    for (published, modified) in cases {
      let mut a = anmeldung();
      a.date_published = published.map(DateValue::from);
      a.date_modified = modified.map(DateValue::from);
      let v = to_json(&generate(SchemaKind::Article, &a, &site(), now()).unwrap());
      let p = v["datePublished"].as_str().unwrap();
      let m = v["dateModified"].as_str().unwrap();
      // The ISO format is fixed-width, so string order is time order.
      assert!(m >= p, "{published:?}/{modified:?}: {m} < {p}");
    }
  }

  #[test]
  fn date_modified_without_publication_date_is_kept() {
    let mut a = anmeldung();
    a.date_published = None;
    a.date_modified = Some("2024-01-10".into());
    let v = to_json(&generate(SchemaKind::Article, &a, &site(), now()).unwrap());
    assert_eq!(v["dateModified"], "2024-01-10T00:00:00.000Z");
  }

  #[test]
  fn hostile_title_produces_parseable_json() {
    let mut a = anmeldung();
    a.title = "<h1>The \"Real\"\n\tGuide</h1>\r\n".into();
    let doc = generate(SchemaKind::Article, &a, &site(), now()).unwrap();
    let text = serde_json::to_string(&doc).unwrap();
    let v: Value = serde_json::from_str(&text).unwrap();
    let headline = v["headline"].as_str().unwrap();
    assert_eq!(headline, "The &quot;Real&quot; Guide");
  }

  // ── Breadcrumb ──────────────────────────────────────────────────────────────

  fn assert_contiguous(v: &Value) {
    let items = v["itemListElement"].as_array().unwrap();
    assert_eq!(v["numberOfItems"].as_u64().unwrap() as usize, items.len());
    for (i, item) in items.iter().enumerate() {
      assert_eq!(item["position"].as_u64().unwrap() as usize, i + 1);
      assert_eq!(item["@type"], "ListItem");
    }
  }

  #[test]
  fn article_breadcrumb_has_four_levels() {
    let v = to_json(&generate(SchemaKind::Breadcrumb, &anmeldung(), &site(), now()).unwrap());
    assert_eq!(v["@type"], "BreadcrumbList");
    assert_contiguous(&v);
    let items = v["itemListElement"].as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[0]["name"], "Home");
    assert_eq!(items[0]["item"], "https://example.com");
    assert_eq!(items[1]["item"], "https://example.com/knowledge");
    assert_eq!(items[2]["name"], "Bureaucracy");
    assert_eq!(
      items[2]["item"],
      "https://example.com/knowledge/category/bureaucracy"
    );
    assert_eq!(items[3]["name"], "Ultimate Anmeldung Guide");
  }

  #[test]
  fn missing_category_shifts_current_item_to_position_three() {
    let mut a = anmeldung();
    a.category = Category::Other(String::new());
    let v = to_json(&generate(SchemaKind::Breadcrumb, &a, &site(), now()).unwrap());
    assert_contiguous(&v);
    let items = v["itemListElement"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[2]["position"], 3);
    assert_eq!(items[2]["name"], "Ultimate Anmeldung Guide");
  }

  #[test]
  fn listing_breadcrumbs_are_contiguous() {
    for trail in [
      vec![],
      vec![Crumb::new("All articles", "/knowledge/all")],
      vec![Crumb::new("A", "/a"), Crumb::new("B", "/b"), Crumb::new("C", "/c")],
    ] {
      let list = breadcrumb_list(&site(), &trail);
      assert_eq!(list.number_of_items, trail.len() + 2);
      assert_contiguous(&to_json(&StructuredData::BreadcrumbList(list)));
    }
  }

  // ── FAQ ─────────────────────────────────────────────────────────────────────

  #[test]
  fn faq_without_entries_is_none() {
    assert!(generate(SchemaKind::Faq, &anmeldung(), &site(), now()).is_none());
  }

  #[test]
  fn faq_with_only_blank_entries_is_none() {
    let mut a = anmeldung();
    a.faqs = vec![Faq { question: " <br> ".into(), answer: "yes".into() }];
    assert!(generate(SchemaKind::Faq, &a, &site(), now()).is_none());
  }

  #[test]
  fn faq_document_keeps_entry_order() {
    let mut a = anmeldung();
    a.faqs = vec![
      Faq { question: "Do I need an appointment?".into(), answer: "Usually.".into() },
      Faq { question: "Is it free?".into(), answer: "<p>Yes.</p>".into() },
    ];
    let v = to_json(&generate(SchemaKind::Faq, &a, &site(), now()).unwrap());
    assert_eq!(v["@type"], "FAQPage");
    let entities = v["mainEntity"].as_array().unwrap();
    assert_eq!(entities.len(), 2);
    assert_eq!(entities[0]["@type"], "Question");
    assert_eq!(entities[0]["name"], "Do I need an appointment?");
    assert_eq!(entities[1]["acceptedAnswer"]["@type"], "Answer");
    assert_eq!(entities[1]["acceptedAnswer"]["text"], "Yes.");
  }

  // ── HowTo ───────────────────────────────────────────────────────────────────

  #[test]
  fn bureaucracy_category_yields_how_to() {
    let v = to_json(&generate(SchemaKind::HowTo, &anmeldung(), &site(), now()).unwrap());
    assert_eq!(v["@type"], "HowTo");
    assert_eq!(v["name"], "Ultimate Anmeldung Guide");
    assert!(
      v["url"]
        .as_str()
        .unwrap()
        .ends_with("/knowledge/ultimate-anmeldung-guide-germany")
    );
    assert!(v.get("step").is_none());
  }

  #[test]
  fn how_to_is_skipped_for_plain_articles() {
    let mut a = anmeldung();
    a.title = "Berlin rents in 2025".into();
    a.category = Category::Housing;
    assert!(generate(SchemaKind::HowTo, &a, &site(), now()).is_none());
  }

  #[test]
  fn how_to_steps_follow_headings() {
    let mut a = anmeldung();
    a.content = Some(
      "Intro.\n\n## Book an appointment\nUse the online portal.\n\n## Bring your documents\n"
        .into(),
    );
    let v = to_json(&generate(SchemaKind::HowTo, &a, &site(), now()).unwrap());
    let steps = v["step"].as_array().unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["position"], 1);
    assert_eq!(steps[0]["name"], "Book an appointment");
    assert_eq!(steps[0]["text"], "Use the online portal.");
    assert_eq!(
      steps[0]["url"],
      "https://example.com/knowledge/ultimate-anmeldung-guide-germany#book-an-appointment"
    );
    assert_eq!(steps[1]["position"], 2);
    assert_eq!(steps[1]["text"], "Bring your documents");
  }

  // ── Organization ────────────────────────────────────────────────────────────

  #[test]
  fn organization_comes_from_site_config() {
    let v = to_json(&generate(SchemaKind::Organization, &anmeldung(), &site(), now()).unwrap());
    assert_eq!(v["@type"], "Organization");
    assert_eq!(v["name"], "Example GmbH");
    assert_eq!(v["url"], "https://example.com");
    assert_eq!(v["description"], "Guides for newcomers");
    assert_eq!(v["sameAs"][0], "https://social.example/@example");
  }

  // ── Whole page ──────────────────────────────────────────────────────────────

  #[test]
  fn generate_all_skips_unmet_kinds() {
    let docs = generate_all(&anmeldung(), &site(), now());
    let types: Vec<_> = docs
      .iter()
      .map(|d| to_json(d)["@type"].as_str().unwrap().to_string())
      .collect();
    assert_eq!(types, ["Article", "BreadcrumbList", "HowTo", "Organization"]);
  }

  #[test]
  fn generation_is_deterministic() {
    let a = anmeldung();
    assert_eq!(generate_all(&a, &site(), now()), generate_all(&a, &site(), now()));
  }

  #[test]
  fn script_tag_cannot_be_closed_by_content() {
    let mut a = anmeldung();
    a.faqs = vec![Faq {
      question: "Why is 1 </ 2?".into(),
      answer:   "Escaped.".into(),
    }];
    let doc = generate(SchemaKind::Faq, &a, &site(), now()).unwrap();
    let tag = script_tag(&doc).unwrap();
    assert!(tag.starts_with(r#"<script type="application/ld+json">"#));
    assert!(tag.contains(r"1 <\/ 2?"), "{tag}");
    assert_eq!(tag.matches("</").count(), 1);
  }

  #[test]
  fn schema_kind_parsing() {
    assert_eq!(SchemaKind::parse("faq").unwrap(), SchemaKind::Faq);
    assert_eq!(SchemaKind::parse("HowTo").unwrap(), SchemaKind::HowTo);
    assert_eq!(SchemaKind::Breadcrumb.to_string(), "breadcrumb");
    assert!(matches!(
      SchemaKind::parse("recipe"),
      Err(Error::UnknownSchemaKind(_))
    ));
  }
}
