//! Date normalization.
//!
//! Articles carry dates in whatever shape the store returned them: native
//! timestamps, strings, or nothing at all. Every consumer (structured data,
//! sitemap) goes through this module so there is exactly one fallback chain
//! and one output format.

use chrono::{
  DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone as _, Utc,
};

use crate::article::{Article, DateValue};

/// Interpret a single stored date. Returns `None` for unparseable text.
pub fn parse(value: &DateValue) -> Option<DateTime<Utc>> {
  match value {
    DateValue::Timestamp(dt) => Some(*dt),
    DateValue::Text(s) => parse_text(s.trim()),
  }
}

fn parse_text(s: &str) -> Option<DateTime<Utc>> {
  if s.is_empty() {
    return None;
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.with_timezone(&Utc));
  }
  if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
    return Some(Utc.from_utc_datetime(&naive));
  }
  if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
    return Some(Utc.from_utc_datetime(&naive));
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Normalize an optional stored date; absent or unparseable means `now`.
pub fn normalize(value: Option<&DateValue>, now: DateTime<Utc>) -> DateTime<Utc> {
  first_valid([value], now)
}

fn first_parsed<const N: usize>(
  chain: [Option<&DateValue>; N],
) -> Option<DateTime<Utc>> {
  chain.into_iter().flatten().find_map(parse)
}

fn first_valid<const N: usize>(
  chain: [Option<&DateValue>; N],
  now: DateTime<Utc>,
) -> DateTime<Utc> {
  first_parsed(chain).unwrap_or(now)
}

/// `datePublished → dateCreated → now`.
pub fn published(article: &Article, now: DateTime<Utc>) -> DateTime<Utc> {
  first_valid(
    [article.date_published.as_ref(), article.date_created.as_ref()],
    now,
  )
}

/// `dateModified → datePublished → dateCreated → now`, never earlier than a
/// stored publication or creation date.
pub fn modified(article: &Article, now: DateTime<Utc>) -> DateTime<Utc> {
  let stored =
    first_parsed([article.date_published.as_ref(), article.date_created.as_ref()]);
  let modified =
    first_valid([article.date_modified.as_ref()], stored.unwrap_or(now));
  match stored {
    Some(published) => modified.max(published),
    None => modified,
  }
}

/// The one timestamp format used in every generated document,
/// e.g. `2024-01-10T00:00:00.000Z`.
pub fn format_iso(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}
