//! Text cleanup for values embedded in structured data.
//!
//! Editors paste titles and descriptions straight from rich-text sources, so
//! they routinely contain markup, hard line breaks and quotes.

use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"<[^>]*>").expect("static regex"));

static BREAKS: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\s*[\r\n\t]+\s*").expect("static regex"));

/// Strip HTML tags, collapse line breaks and tabs into single spaces, escape
/// double quotes as `&quot;` and trim.
pub fn sanitize(text: &str) -> String {
  let without_tags = TAG.replace_all(text, "");
  let flattened = BREAKS.replace_all(&without_tags, " ");
  flattened.replace('"', "&quot;").trim().to_owned()
}

/// [`sanitize`] for optional values; blank results become `None`.
pub fn sanitize_opt(text: Option<&str>) -> Option<String> {
  text.map(sanitize).filter(|s| !s.is_empty())
}
