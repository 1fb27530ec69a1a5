//! schema.org document shapes.
//!
//! Each top-level type has its own struct with its own required fields; the
//! [`StructuredData`] enum tags them with `@type` on serialisation.

use serde::Serialize;

pub const CONTEXT: &str = "https://schema.org";

// ─── Top level ───────────────────────────────────────────────────────────────

/// One JSON-LD document, ready to embed in a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "@type")]
pub enum StructuredData {
  Article(ArticleSchema),
  BreadcrumbList(BreadcrumbList),
  #[serde(rename = "FAQPage")]
  FaqPage(FaqPage),
  HowTo(HowTo),
  Organization(OrganizationSchema),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSchema {
  #[serde(rename = "@context")]
  pub context:             &'static str,
  pub headline:            String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description:         Option<String>,
  pub image:               ImageObject,
  pub date_published:      String,
  pub date_modified:       String,
  pub author:              AuthorNode,
  pub publisher:           Publisher,
  pub main_entity_of_page: WebPageRef,
  pub url:                 String,
  pub article_section:     String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub keywords:            Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub word_count:          Option<u32>,
  /// ISO-8601 duration, e.g. `PT6M`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub time_required:       Option<String>,
  pub in_language:         String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbList {
  #[serde(rename = "@context")]
  pub context:           &'static str,
  pub number_of_items:   usize,
  pub item_list_element: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPage {
  #[serde(rename = "@context")]
  pub context:     &'static str,
  pub main_entity: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HowTo {
  #[serde(rename = "@context")]
  pub context:     &'static str,
  pub name:        String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub url:         String,
  pub image:       ImageObject,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub total_time:  Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub step:        Vec<HowToStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSchema {
  #[serde(rename = "@context")]
  pub context:     &'static str,
  pub name:        String,
  pub url:         String,
  pub logo:        ImageObject,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub same_as:     Vec<String>,
}

// ─── Nested nodes ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageObject {
  #[serde(rename = "@type")]
  pub kind: &'static str,
  pub url:  String,
}

impl ImageObject {
  pub fn new(url: String) -> Self { Self { kind: "ImageObject", url } }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "@type")]
pub enum AuthorNode {
  Person {
    name: String,
  },
  Organization {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url:  Option<String>,
  },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Publisher {
  #[serde(rename = "@type")]
  pub kind: &'static str,
  pub name: String,
  pub logo: ImageObject,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebPageRef {
  #[serde(rename = "@type")]
  pub kind: &'static str,
  #[serde(rename = "@id")]
  pub id:   String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
  #[serde(rename = "@type")]
  pub kind:     &'static str,
  /// 1-based.
  pub position: usize,
  pub name:     String,
  pub item:     String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  #[serde(rename = "@type")]
  pub kind:            &'static str,
  pub name:            String,
  pub accepted_answer: Answer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
  #[serde(rename = "@type")]
  pub kind: &'static str,
  pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HowToStep {
  #[serde(rename = "@type")]
  pub kind:     &'static str,
  pub position: usize,
  pub name:     String,
  pub text:     String,
  pub url:      String,
}
