//! Sitemap assembly and its sitemaps.org XML rendering.

use std::{sync::Arc, time::Duration as StdDuration};

use chrono::{DateTime, Utc};
use knowledge_core::{
  dates,
  site::SiteConfig,
  sitemap::{SitemapEntry, article_entry, static_entries},
  store::ContentStore,
};
use quick_xml::{
  Writer,
  events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use tokio::task::JoinHandle;

use crate::{
  AppState,
  cache::CachedPage,
  error::ApiError,
};

/// Cache key and route of the XML sitemap.
pub const SITEMAP_PATH: &str = "/sitemap.xml";

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

pub const CONTENT_TYPE_XML: &str = "application/xml; charset=utf-8";

// ─── Assembly ────────────────────────────────────────────────────────────────

/// Static entries followed by one entry per published article, in store
/// order.
///
/// Never fails: if the store cannot be read the failure is logged and the
/// static entries alone are returned, so crawlers still get a valid sitemap.
pub async fn build_sitemap<S>(
  store: &S,
  site: &SiteConfig,
  now: DateTime<Utc>,
) -> Vec<SitemapEntry>
where
  S: ContentStore,
{
  let mut entries = static_entries(site, now);
  match store.list_published().await {
    Ok(articles) => {
      entries.extend(articles.iter().map(|a| article_entry(site, a, now)));
    }
    Err(e) => {
      tracing::warn!(error = %e, "content store unavailable; serving static sitemap");
    }
  }
  entries
}

// ─── XML ─────────────────────────────────────────────────────────────────────

/// Render `entries` as a sitemaps.org `<urlset>` document.
pub fn to_xml(entries: &[SitemapEntry]) -> Result<String, ApiError> {
  let mut writer = Writer::new(Vec::new());
  writer
    .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    .map_err(xml_err)?;

  let mut urlset = BytesStart::new("urlset");
  urlset.push_attribute(("xmlns", SITEMAP_NS));
  writer.write_event(Event::Start(urlset)).map_err(xml_err)?;

  for entry in entries {
    let freq: &'static str = entry.change_frequency.into();
    writer
      .write_event(Event::Start(BytesStart::new("url")))
      .map_err(xml_err)?;
    write_text_elem(&mut writer, "loc", &entry.url)?;
    write_text_elem(&mut writer, "lastmod", &dates::format_iso(entry.last_modified))?;
    write_text_elem(&mut writer, "changefreq", freq)?;
    write_text_elem(&mut writer, "priority", &entry.priority.to_string())?;
    writer
      .write_event(Event::End(BytesEnd::new("url")))
      .map_err(xml_err)?;
  }

  writer
    .write_event(Event::End(BytesEnd::new("urlset")))
    .map_err(xml_err)?;
  String::from_utf8(writer.into_inner()).map_err(xml_err)
}

fn write_text_elem(
  w: &mut Writer<Vec<u8>>,
  tag: &str,
  text: &str,
) -> Result<(), ApiError> {
  w.write_event(Event::Start(BytesStart::new(tag))).map_err(xml_err)?;
  w.write_event(Event::Text(BytesText::new(text))).map_err(xml_err)?;
  w.write_event(Event::End(BytesEnd::new(tag))).map_err(xml_err)
}

fn xml_err(e: impl std::fmt::Display) -> ApiError {
  ApiError::Render(format!("sitemap xml: {e}"))
}

// ─── Cached rendering ────────────────────────────────────────────────────────

/// Rebuild the XML sitemap from scratch and store it in the render cache.
pub async fn refresh<S>(
  state: &AppState<S>,
  now: DateTime<Utc>,
) -> Result<Arc<CachedPage>, ApiError>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let entries = build_sitemap(state.store.as_ref(), &state.config.site, now).await;
  let xml = to_xml(&entries)?;
  tracing::debug!(entries = entries.len(), "rebuilt sitemap");
  Ok(
    state
      .pages
      .insert(SITEMAP_PATH, CachedPage::new(xml, CONTENT_TYPE_XML, now)),
  )
}

/// Rebuild the sitemap every `sitemap_ttl_secs`, starting immediately.
pub fn spawn_refresher<S>(state: AppState<S>) -> JoinHandle<()>
where
  S: ContentStore + Clone + Send + Sync + 'static,
{
  let period = StdDuration::from_secs(state.config.sitemap_ttl_secs.max(1));
  tokio::spawn(async move {
    let mut interval = tokio::time::interval(period);
    loop {
      interval.tick().await;
      if let Err(e) = refresh(&state, Utc::now()).await {
        tracing::warn!(error = %e, "scheduled sitemap rebuild failed");
      }
    }
  })
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use knowledge_core::article::{Article, ArticleStatus, Category};

  use super::*;
  use crate::tests::{FailingStore, memory_store, site};

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
  }

  #[tokio::test]
  async fn store_failure_yields_static_entries() {
    let entries = build_sitemap(&FailingStore, &site(), now()).await;
    assert_eq!(entries.len(), 3);
    let priorities: Vec<f64> = entries.iter().map(|e| e.priority).collect();
    assert_eq!(priorities, [1.0, 0.9, 0.85]);
  }

  #[tokio::test]
  async fn articles_follow_static_entries_in_store_order() {
    let store = memory_store().await;
    for (slug, date) in [("older", "2024-01-01"), ("newer", "2024-05-01")] {
      let mut a = Article::new(slug, slug, Category::Work);
      a.status = ArticleStatus::Published;
      a.date_published = Some(date.into());
      store.upsert_article(&a).await.unwrap();
    }

    let entries = build_sitemap(&store, &site(), now()).await;
    let urls: Vec<&str> = entries.iter().skip(3).map(|e| e.url.as_str()).collect();
    assert_eq!(urls, [
      "https://example.com/knowledge/newer",
      "https://example.com/knowledge/older",
    ]);
  }

  #[test]
  fn xml_has_one_url_per_entry() {
    let entries = static_entries(&site(), now());
    let xml = to_xml(&entries).unwrap();
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
    assert_eq!(xml.matches("<url>").count(), 3);
    assert!(xml.contains("<loc>https://example.com/knowledge/all</loc>"));
    assert!(xml.contains("<lastmod>2025-06-01T12:00:00.000Z</lastmod>"));
    assert!(xml.contains("<changefreq>daily</changefreq>"));
    assert!(xml.contains("<priority>0.85</priority>"));
  }

  #[test]
  fn xml_escapes_urls() {
    let mut entries = static_entries(&site(), now());
    entries[0].url = "https://example.com/?a=1&b=2".into();
    let xml = to_xml(&entries).unwrap();
    assert!(xml.contains("<loc>https://example.com/?a=1&amp;b=2</loc>"));
  }
}
