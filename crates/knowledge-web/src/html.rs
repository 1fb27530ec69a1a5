//! Minimal HTML renderings of the public pages.
//!
//! Markup is deliberately bare: the point of these pages is the head (title,
//! canonical link, description and JSON-LD), which crawlers read.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use knowledge_core::{article::Article, sanitize::sanitize, site::SiteConfig};
use knowledge_jsonld::{
  Crumb, StructuredData, breadcrumb_list, generate_all, heading_anchor,
  organization, script_tag,
};
use quick_xml::escape::escape;

use crate::error::ApiError;

pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";

struct Head<'a> {
  title:       &'a str,
  description: Option<&'a str>,
  canonical:   String,
  json_ld:     Vec<StructuredData>,
}

fn document(site: &SiteConfig, head: Head<'_>, body: &str) -> Result<String, ApiError> {
  let mut out = String::new();
  let _ = write!(
    out,
    "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<link rel=\"canonical\" href=\"{}\">\n",
    escape(&site.language),
    escape(head.title),
    escape(&head.canonical),
  );
  if let Some(description) = head.description.filter(|d| !d.trim().is_empty()) {
    let _ = writeln!(
      out,
      "<meta name=\"description\" content=\"{}\">",
      escape(description)
    );
  }
  for doc in &head.json_ld {
    out.push_str(&script_tag(doc)?);
    out.push('\n');
  }
  out.push_str("</head>\n<body>\n");
  out.push_str(body);
  out.push_str("</body>\n</html>\n");
  Ok(out)
}

// ─── Pages ───────────────────────────────────────────────────────────────────

pub fn home(site: &SiteConfig) -> Result<String, ApiError> {
  let body = format!(
    "<h1>{}</h1>\n<p><a href=\"{}\">{}</a></p>\n",
    escape(&site.site_name),
    escape(site.listing_root()),
    escape(&site.listing_title),
  );
  document(
    site,
    Head {
      title:       &site.site_name,
      description: site.organization_description.as_deref(),
      canonical:   site.absolute_url("/"),
      json_ld:     vec![StructuredData::Organization(organization(site))],
    },
    &body,
  )
}

/// A list of article links. `trail` is the breadcrumb below the listing root.
pub fn listing(
  site: &SiteConfig,
  title: &str,
  path: &str,
  trail: &[Crumb],
  articles: &[Article],
) -> Result<String, ApiError> {
  let mut body = format!("<h1>{}</h1>\n<ul>\n", escape(title));
  for article in articles {
    let _ = write!(
      body,
      "<li><a href=\"{}\">{}</a>",
      escape(&site.article_path(&article.slug)),
      escape(&article.title),
    );
    if !article.description.trim().is_empty() {
      let _ = write!(body, "<p>{}</p>", escape(&article.description));
    }
    body.push_str("</li>\n");
  }
  body.push_str("</ul>\n");

  document(
    site,
    Head {
      title,
      description: None,
      canonical: site.absolute_url(path),
      json_ld: vec![StructuredData::BreadcrumbList(breadcrumb_list(site, trail))],
    },
    &body,
  )
}

pub fn article(
  site: &SiteConfig,
  article: &Article,
  now: DateTime<Utc>,
) -> Result<String, ApiError> {
  let mut body = format!("<article>\n<h1>{}</h1>\n", escape(&article.title));
  if let Some(reading_time) = article.effective_reading_time() {
    let _ = writeln!(body, "<p>{}</p>", escape(&reading_time));
  }
  if let Some(content) = article.content.as_deref() {
    render_markdown(&mut body, content);
  }
  if !article.faqs.is_empty() {
    body.push_str("<section>\n<h2>FAQ</h2>\n<dl>\n");
    for faq in &article.faqs {
      let _ = writeln!(
        body,
        "<dt>{}</dt><dd>{}</dd>",
        escape(&faq.question),
        escape(&faq.answer),
      );
    }
    body.push_str("</dl>\n</section>\n");
  }
  body.push_str("</article>\n");

  document(
    site,
    Head {
      title:       &article.title,
      description: Some(&article.description),
      canonical:   site.absolute_url(&site.article_path(&article.slug)),
      json_ld:     generate_all(article, site, now),
    },
    &body,
  )
}

// ─── Markdown ────────────────────────────────────────────────────────────────

/// Headings and paragraphs only. Level-2 headings get the same anchors the
/// HowTo steps link to.
fn render_markdown(out: &mut String, content: &str) {
  let mut paragraph: Vec<&str> = Vec::new();
  for line in content.lines().map(str::trim) {
    let heading = line
      .strip_prefix("### ")
      .map(|h| (3, h))
      .or_else(|| line.strip_prefix("## ").map(|h| (2, h)));

    if line.is_empty() || heading.is_some() || line.starts_with("# ") {
      flush_paragraph(out, &mut paragraph);
    } else {
      paragraph.push(line);
      continue;
    }

    match heading {
      Some((2, text)) => {
        let _ = writeln!(
          out,
          "<h2 id=\"{}\">{}</h2>",
          escape(&heading_anchor(&sanitize(text))),
          escape(text.trim()),
        );
      }
      Some((_, text)) => {
        let _ = writeln!(out, "<h3>{}</h3>", escape(text.trim()));
      }
      None => {}
    }
  }
  flush_paragraph(out, &mut paragraph);
}

fn flush_paragraph(out: &mut String, lines: &mut Vec<&str>) {
  if !lines.is_empty() {
    let _ = writeln!(out, "<p>{}</p>", escape(&lines.join(" ")));
    lines.clear();
  }
}
