//! `robots.txt` generation.
//!
//! Everything public is crawlable; admin and API routes are not. Known AI and
//! answer-engine crawlers get their own groups so the policy towards them is
//! explicit rather than inherited from `*`.

use std::fmt::Write as _;

use knowledge_core::site::SiteConfig;

/// Paths no crawler should fetch.
pub const DISALLOWED: [&str; 2] = ["/admin/", "/api/"];

/// Crawlers that are named explicitly, in output order.
pub const AI_CRAWLERS: [&str; 10] = [
  "GPTBot",
  "ChatGPT-User",
  "OAI-SearchBot",
  "ClaudeBot",
  "Claude-Web",
  "anthropic-ai",
  "PerplexityBot",
  "Google-Extended",
  "Applebot-Extended",
  "CCBot",
];

pub fn robots_txt(site: &SiteConfig) -> String {
  let mut out = String::new();
  for agent in std::iter::once("*").chain(AI_CRAWLERS) {
    let _ = writeln!(out, "User-agent: {agent}");
    let _ = writeln!(out, "Allow: /");
    for path in DISALLOWED {
      let _ = writeln!(out, "Disallow: {path}");
    }
    out.push('\n');
  }
  let _ = writeln!(out, "Sitemap: {}", site.sitemap_url());
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tests::site;

  #[test]
  fn wildcard_group_comes_first() {
    let txt = robots_txt(&site());
    assert!(txt.starts_with("User-agent: *\nAllow: /\nDisallow: /admin/\nDisallow: /api/\n"));
  }

  #[test]
  fn every_ai_crawler_has_a_group() {
    let txt = robots_txt(&site());
    for agent in AI_CRAWLERS {
      assert!(txt.contains(&format!("User-agent: {agent}\nAllow: /")), "{agent}");
    }
    assert_eq!(txt.matches("Disallow: /api/").count(), AI_CRAWLERS.len() + 1);
  }

  #[test]
  fn points_at_the_sitemap() {
    let txt = robots_txt(&site());
    assert!(txt.trim_end().ends_with("Sitemap: https://example.com/sitemap.xml"));
  }
}
