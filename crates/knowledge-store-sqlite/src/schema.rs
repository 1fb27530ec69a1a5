//! SQL schema for the knowledge SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS articles (
    article_id     TEXT PRIMARY KEY,
    slug           TEXT NOT NULL,
    title          TEXT NOT NULL,
    description    TEXT NOT NULL DEFAULT '',
    category       TEXT NOT NULL,
    tags           TEXT NOT NULL DEFAULT '[]',   -- JSON array
    date_published TEXT,                         -- JSON-encoded DateValue or NULL
    date_modified  TEXT,                         -- JSON-encoded DateValue or NULL
    date_created   TEXT,                         -- JSON-encoded DateValue or NULL
    published_sort TEXT NOT NULL DEFAULT '',     -- fixed-width UTC; '' when unknown
    author         TEXT,                         -- JSON-encoded Author or NULL
    featured_image TEXT,
    status         TEXT NOT NULL DEFAULT 'draft', -- 'draft' | 'published'
    word_count     INTEGER,
    reading_time   TEXT,
    keywords       TEXT NOT NULL DEFAULT '[]',   -- JSON array
    faqs           TEXT NOT NULL DEFAULT '[]',   -- JSON array of {question, answer}
    content        TEXT
);

-- Slugs route public URLs, so they must be unique among published articles.
CREATE UNIQUE INDEX IF NOT EXISTS articles_published_slug_idx
    ON articles(slug) WHERE status = 'published';

CREATE INDEX IF NOT EXISTS articles_listing_idx
    ON articles(status, published_sort DESC, slug);

PRAGMA user_version = 1;
";
