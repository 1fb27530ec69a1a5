//! Site-wide constants threaded explicitly through every generator.

use serde::{Deserialize, Serialize};

/// Fixed facts about the site: where it lives and who publishes it.
///
/// Deserialised from the `[site]` table of the server configuration; tests
/// build fixtures directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
  /// Absolute origin without a trailing slash, e.g. `https://example.com`.
  pub base_url:                 String,
  pub site_name:                String,
  pub organization_name:        String,
  /// Absolute URL or site-relative path of the publisher logo.
  pub organization_logo:        String,
  #[serde(default)]
  pub organization_description: Option<String>,
  /// Social profiles for the Organization document's `sameAs`.
  #[serde(default)]
  pub same_as:                  Vec<String>,
  /// Used when an article has no featured image.
  pub default_image:            String,
  /// Root of the article listing, e.g. `/knowledge`.
  #[serde(default = "default_listing_path")]
  pub listing_path:             String,
  /// Breadcrumb label for the listing root.
  #[serde(default = "default_listing_title")]
  pub listing_title:            String,
  #[serde(default = "default_language")]
  pub language:                 String,
}

fn default_listing_path() -> String { "/knowledge".to_string() }

fn default_listing_title() -> String { "Knowledge".to_string() }

fn default_language() -> String { "en".to_string() }

impl SiteConfig {
  pub fn base(&self) -> &str { self.base_url.trim_end_matches('/') }

  /// Make `path_or_url` absolute against [`Self::base_url`]; already-absolute
  /// URLs pass through unchanged.
  pub fn absolute_url(&self, path_or_url: &str) -> String {
    if path_or_url.starts_with("http://") || path_or_url.starts_with("https://")
    {
      return path_or_url.to_string();
    }
    if path_or_url.is_empty() || path_or_url == "/" {
      return self.base().to_string();
    }
    if path_or_url.starts_with('/') {
      format!("{}{}", self.base(), path_or_url)
    } else {
      format!("{}/{}", self.base(), path_or_url)
    }
  }

  pub fn listing_root(&self) -> &str {
    let trimmed = self.listing_path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
  }

  /// The unfiltered "all articles" listing, e.g. `/knowledge/all`.
  pub fn listing_all_path(&self) -> String {
    format!("{}/all", self.listing_root().trim_end_matches('/'))
  }

  /// Detail page for one article, e.g. `/knowledge/{slug}`.
  pub fn article_path(&self, slug: &str) -> String {
    format!("{}/{}", self.listing_root().trim_end_matches('/'), slug)
  }

  /// Listing filtered to one category, e.g. `/knowledge/category/housing`.
  pub fn category_path(&self, category_slug: &str) -> String {
    format!(
      "{}/category/{}",
      self.listing_root().trim_end_matches('/'),
      category_slug
    )
  }

  pub fn sitemap_url(&self) -> String { self.absolute_url("/sitemap.xml") }
}
