//! Async HTTP client for the knowledge server's JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{Value, json};

/// Body of a successful `POST /api/revalidate`.
#[derive(Debug, Deserialize)]
pub struct Revalidated {
  pub slug:      String,
  pub paths:     Vec<String>,
  pub timestamp: String,
}

/// One row of `GET /api/sitemap`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapRow {
  pub url:              String,
  pub last_modified:    String,
  pub change_frequency: String,
  pub priority:         f64,
}

#[derive(Deserialize)]
struct ErrorBody {
  error:   String,
  message: String,
}

/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url.trim_end_matches('/'), path)
  }

  /// `POST /api/revalidate`
  pub async fn revalidate(&self, slug: &str) -> Result<Revalidated> {
    let resp = self
      .client
      .post(self.url("/api/revalidate"))
      .json(&json!({ "slug": slug }))
      .send()
      .await
      .context("POST /api/revalidate failed")?;
    let resp = check(resp, "POST /api/revalidate").await?;
    resp.json().await.context("deserialising revalidation result")
  }

  /// `GET /api/sitemap`
  pub async fn sitemap(&self) -> Result<Vec<SitemapRow>> {
    let resp = self
      .client
      .get(self.url("/api/sitemap"))
      .send()
      .await
      .context("GET /api/sitemap failed")?;
    let resp = check(resp, "GET /api/sitemap").await?;
    resp.json().await.context("deserialising sitemap")
  }

  /// `GET /sitemap.xml`, verbatim.
  pub async fn sitemap_xml(&self) -> Result<String> {
    let resp = self
      .client
      .get(self.url("/sitemap.xml"))
      .send()
      .await
      .context("GET /sitemap.xml failed")?;
    let resp = check(resp, "GET /sitemap.xml").await?;
    resp.text().await.context("reading sitemap body")
  }

  /// `GET /api/structured-data/<slug>[?type=<kind>]`
  pub async fn structured_data(&self, slug: &str, kind: Option<&str>) -> Result<Value> {
    let mut req = self.client.get(self.url(&format!("/api/structured-data/{slug}")));
    if let Some(kind) = kind {
      req = req.query(&[("type", kind)]);
    }
    let resp = req.send().await.context("GET /api/structured-data failed")?;
    let resp = check(resp, "GET /api/structured-data").await?;
    resp.json().await.context("deserialising structured data")
  }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn check(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let detail = match resp.json::<ErrorBody>().await {
    Ok(body) => format!("{}: {}", body.error, body.message),
    Err(_) => String::from("no error body"),
  };
  Err(anyhow!("{what} → {status} ({detail})"))
}
