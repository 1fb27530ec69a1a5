//! Article → schema.org document builders.

use chrono::{DateTime, Utc};
use knowledge_core::{
  article::{Article, Author, Category},
  dates,
  sanitize::{sanitize, sanitize_opt},
  site::SiteConfig,
};

use crate::schema::{
  Answer, ArticleSchema, AuthorNode, BreadcrumbList, CONTEXT, FaqPage, HowTo,
  HowToStep, ImageObject, ListItem, OrganizationSchema, Publisher, Question,
  WebPageRef,
};

/// One hop of a breadcrumb trail below the listing root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
  pub name: String,
  /// Site-relative path or absolute URL.
  pub path: String,
}

impl Crumb {
  pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
    Self { name: name.into(), path: path.into() }
  }
}

// ─── HowTo eligibility ───────────────────────────────────────────────────────

/// Whether an article reads as step-by-step instructions: the title contains
/// "how to" or "guide" (any case), or it is filed under bureaucracy.
pub fn is_how_to(title: &str, category: &Category) -> bool {
  let title = title.to_lowercase();
  title.contains("how to")
    || title.contains("guide")
    || *category == Category::Bureaucracy
}

// ─── Shared helpers ──────────────────────────────────────────────────────────

fn article_url(site: &SiteConfig, article: &Article) -> String {
  site.absolute_url(&site.article_path(&article.slug))
}

fn article_image(site: &SiteConfig, article: &Article) -> ImageObject {
  let src = article
    .featured_image
    .as_deref()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .unwrap_or(site.default_image.as_str());
  ImageObject::new(site.absolute_url(src))
}

fn duration(article: &Article) -> Option<String> {
  article.reading_minutes().map(|m| format!("PT{m}M"))
}

fn author_node(site: &SiteConfig, author: Option<&Author>) -> AuthorNode {
  match author {
    Some(Author::Person(name)) if !sanitize(name).is_empty() => {
      AuthorNode::Person { name: sanitize(name) }
    }
    Some(Author::Organization { name, url }) if !sanitize(name).is_empty() => {
      AuthorNode::Organization {
        name: sanitize(name),
        url:  url.as_deref().map(|u| site.absolute_url(u)),
      }
    }
    _ => AuthorNode::Organization {
      name: site.organization_name.clone(),
      url:  Some(site.absolute_url("/")),
    },
  }
}

/// Lowercase, alphanumeric-and-dash anchor for a heading.
pub fn heading_anchor(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for c in text.chars() {
    if c.is_alphanumeric() {
      out.extend(c.to_lowercase());
    } else if !out.ends_with('-') && !out.is_empty() {
      out.push('-');
    }
  }
  out.trim_end_matches('-').to_string()
}

/// Level-2 markdown headings paired with the first paragraph line under each.
fn markdown_steps(content: &str) -> Vec<(String, Option<String>)> {
  let mut steps: Vec<(String, Option<String>)> = Vec::new();
  for line in content.lines() {
    let trimmed = line.trim();
    if let Some(heading) = trimmed.strip_prefix("## ") {
      steps.push((heading.trim().to_string(), None));
    } else if trimmed.is_empty() || trimmed.starts_with('#') {
      continue;
    } else if let Some((_, text)) = steps.last_mut()
      && text.is_none()
    {
      *text = Some(trimmed.to_string());
    }
  }
  steps
}

// ─── Builders ────────────────────────────────────────────────────────────────

pub fn article(
  article: &Article,
  site: &SiteConfig,
  now: DateTime<Utc>,
) -> ArticleSchema {
  let url = article_url(site, article);
  let keywords = if article.keywords.is_empty() {
    &article.tags
  } else {
    &article.keywords
  };
  let keywords = keywords
    .iter()
    .map(|k| sanitize(k))
    .filter(|k| !k.is_empty())
    .collect::<Vec<_>>()
    .join(", ");

  ArticleSchema {
    context:             CONTEXT,
    headline:            sanitize(&article.title),
    description:         sanitize_opt(Some(article.description.as_str())),
    image:               article_image(site, article),
    date_published:      dates::format_iso(dates::published(article, now)),
    date_modified:       dates::format_iso(dates::modified(article, now)),
    author:              author_node(site, article.author.as_ref()),
    publisher:           Publisher {
      kind: "Organization",
      name: site.organization_name.clone(),
      logo: ImageObject::new(site.absolute_url(&site.organization_logo)),
    },
    main_entity_of_page: WebPageRef { kind: "WebPage", id: url.clone() },
    url,
    article_section:     sanitize(article.category.name()),
    keywords:            (!keywords.is_empty()).then_some(keywords),
    word_count:          article.effective_word_count(),
    time_required:       duration(article),
    in_language:         site.language.clone(),
  }
}

/// Home → listing root → `trail`. Positions are 1-based and contiguous.
pub fn breadcrumb_list(site: &SiteConfig, trail: &[Crumb]) -> BreadcrumbList {
  let root = [
    Crumb::new("Home", "/"),
    Crumb::new(site.listing_title.clone(), site.listing_root()),
  ];
  let item_list_element: Vec<ListItem> = root
    .iter()
    .chain(trail)
    .enumerate()
    .map(|(i, crumb)| ListItem {
      kind:     "ListItem",
      position: i + 1,
      name:     sanitize(&crumb.name),
      item:     site.absolute_url(&crumb.path),
    })
    .collect();

  BreadcrumbList {
    context: CONTEXT,
    number_of_items: item_list_element.len(),
    item_list_element,
  }
}

/// The trail below the listing root for an article page: its category (when
/// it has a name) followed by the article itself.
pub fn article_trail(site: &SiteConfig, article: &Article) -> Vec<Crumb> {
  let mut trail = Vec::with_capacity(2);
  if !sanitize(article.category.name()).is_empty() {
    trail.push(Crumb::new(
      article.category.name(),
      site.category_path(&article.category.slug()),
    ));
  }
  trail.push(Crumb::new(
    article.title.clone(),
    site.article_path(&article.slug),
  ));
  trail
}

/// `None` when no question/answer pair survives sanitisation.
pub fn faq_page(article: &Article) -> Option<FaqPage> {
  let main_entity: Vec<Question> = article
    .faqs
    .iter()
    .filter_map(|faq| {
      let name = sanitize(&faq.question);
      let text = sanitize(&faq.answer);
      (!name.is_empty() && !text.is_empty()).then(|| Question {
        kind: "Question",
        name,
        accepted_answer: Answer { kind: "Answer", text },
      })
    })
    .collect();

  (!main_entity.is_empty()).then_some(FaqPage { context: CONTEXT, main_entity })
}

/// `None` unless [`is_how_to`] holds for the article.
pub fn how_to(article: &Article, site: &SiteConfig) -> Option<HowTo> {
  if !is_how_to(&article.title, &article.category) {
    return None;
  }

  let url = article_url(site, article);
  let step = article
    .content
    .as_deref()
    .map(markdown_steps)
    .unwrap_or_default()
    .into_iter()
    .map(|(heading, text)| (sanitize(&heading), text))
    .filter(|(name, _)| !name.is_empty())
    .enumerate()
    .map(|(i, (name, text))| HowToStep {
      kind:     "HowToStep",
      position: i + 1,
      text:     text
        .as_deref()
        .and_then(|t| sanitize_opt(Some(t)))
        .unwrap_or_else(|| name.clone()),
      url:      format!("{url}#{}", heading_anchor(&name)),
      name,
    })
    .collect();

  Some(HowTo {
    context: CONTEXT,
    name: sanitize(&article.title),
    description: sanitize_opt(Some(article.description.as_str())),
    image: article_image(site, article),
    total_time: duration(article),
    url,
    step,
  })
}

pub fn organization(site: &SiteConfig) -> OrganizationSchema {
  OrganizationSchema {
    context:     CONTEXT,
    name:        sanitize(&site.organization_name),
    url:         site.absolute_url("/"),
    logo:        ImageObject::new(site.absolute_url(&site.organization_logo)),
    description: sanitize_opt(site.organization_description.as_deref()),
    same_as:     site.same_as.clone(),
  }
}
