//! Sitemap entry types and the pure parts of sitemap construction.
//!
//! Querying the store (and surviving its failures) is the web layer's job;
//! this module only decides what an entry looks like.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, IntoStaticStr};

use crate::{article::Article, dates, site::SiteConfig};

pub const HOME_PRIORITY: f64 = 1.0;
pub const LISTING_PRIORITY: f64 = 0.9;
pub const LISTING_ALL_PRIORITY: f64 = 0.85;
pub const ARTICLE_PRIORITY: f64 = 0.8;

/// sitemaps.org `<changefreq>` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChangeFrequency {
  Always,
  Hourly,
  Daily,
  Weekly,
  Monthly,
  Yearly,
  Never,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
  pub url:              String,
  #[serde(serialize_with = "serialize_iso")]
  pub last_modified:    DateTime<Utc>,
  pub change_frequency: ChangeFrequency,
  /// 0.0 – 1.0
  pub priority:         f64,
}

fn serialize_iso<S: serde::Serializer>(
  dt: &DateTime<Utc>,
  s: S,
) -> Result<S::Ok, S::Error> {
  s.serialize_str(&dates::format_iso(*dt))
}

/// Home, listing root and the "all" listing, stamped with `now`.
pub fn static_entries(site: &SiteConfig, now: DateTime<Utc>) -> Vec<SitemapEntry> {
  [
    (site.absolute_url("/"), HOME_PRIORITY),
    (site.absolute_url(site.listing_root()), LISTING_PRIORITY),
    (site.absolute_url(&site.listing_all_path()), LISTING_ALL_PRIORITY),
  ]
  .into_iter()
  .map(|(url, priority)| SitemapEntry {
    url,
    last_modified: now,
    change_frequency: ChangeFrequency::Daily,
    priority,
  })
  .collect()
}

pub fn article_entry(
  site: &SiteConfig,
  article: &Article,
  now: DateTime<Utc>,
) -> SitemapEntry {
  SitemapEntry {
    url:              site.absolute_url(&site.article_path(&article.slug)),
    last_modified:    dates::modified(article, now),
    change_frequency: ChangeFrequency::Weekly,
    priority:         ARTICLE_PRIORITY,
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::{article::Category, site::fixtures::site};

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
  }

  #[test]
  fn static_entries_are_fixed() {
    let entries = static_entries(&site(), now());
    let urls: Vec<_> = entries.iter().map(|e| e.url.as_str()).collect();
    assert_eq!(urls, [
      "https://example.com",
      "https://example.com/knowledge",
      "https://example.com/knowledge/all",
    ]);
    let priorities: Vec<_> = entries.iter().map(|e| e.priority).collect();
    assert_eq!(priorities, [1.0, 0.9, 0.85]);
    assert!(entries.iter().all(|e| {
      e.change_frequency == ChangeFrequency::Daily && e.last_modified == now()
    }));
  }

  #[test]
  fn article_entry_uses_modified_fallback() {
    let mut a = Article::new("rent-a-flat", "Renting", Category::Housing);
    a.date_published = Some("2024-01-10".into());
    let e = article_entry(&site(), &a, now());
    assert_eq!(e.url, "https://example.com/knowledge/rent-a-flat");
    assert_eq!(e.change_frequency, ChangeFrequency::Weekly);
    assert_eq!(e.priority, 0.8);
    assert_eq!(
      e.last_modified,
      Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()
    );
  }

  #[test]
  fn entry_json_shape() {
    let entries = static_entries(&site(), now());
    let v = serde_json::to_value(&entries[0]).unwrap();
    assert_eq!(v["lastModified"], "2025-06-01T12:00:00.000Z");
    assert_eq!(v["changeFrequency"], "daily");
    assert_eq!(v["priority"], 1.0);
  }
}
