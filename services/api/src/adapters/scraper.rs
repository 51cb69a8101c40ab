//! services/api/src/adapters/scraper.rs
//!
//! This module contains the adapter for the Firecrawl scraping API.
//! It implements the `ContentFetchService` port from the `core` crate.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reskick_core::{
    domain::ScrapedPage,
    ports::{ContentFetchService, PortError, PortResult},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

const SCRAPE_FAILED: &str = "Failed to scrape URL";

/// Prefixes `https://` to a URL that carries no http(s) scheme.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'static str; 1],
    only_main_content: bool,
}

#[derive(Deserialize, Default)]
struct ScrapeMetadata {
    title: Option<String>,
}

#[derive(Deserialize, Default)]
struct ScrapeData {
    markdown: Option<String>,
    metadata: Option<ScrapeMetadata>,
}

/// Firecrawl nests the page under `data`; older responses put it at the top level.
#[derive(Deserialize, Default)]
struct ScrapeResponse {
    data: Option<ScrapeData>,
    markdown: Option<String>,
    metadata: Option<ScrapeMetadata>,
    error: Option<String>,
}

fn first_non_empty(candidates: [Option<String>; 2]) -> String {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

impl ScrapeResponse {
    fn into_page(self) -> ScrapedPage {
        let (data_markdown, data_title) = match self.data {
            Some(data) => (data.markdown, data.metadata.and_then(|m| m.title)),
            None => (None, None),
        };
        ScrapedPage {
            content: first_non_empty([data_markdown, self.markdown]),
            title: first_non_empty([data_title, self.metadata.and_then(|m| m.title)]),
        }
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ContentFetchService` using Firecrawl's `/scrape` endpoint.
#[derive(Clone)]
pub struct FirecrawlAdapter {
    http: Client,
    api_url: String,
    api_key: String,
}

impl FirecrawlAdapter {
    /// Creates a new `FirecrawlAdapter`. `api_url` is the versioned API root,
    /// e.g. `https://api.firecrawl.dev/v1`.
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> PortResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }
}

//=========================================================================================
// `ContentFetchService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ContentFetchService for FirecrawlAdapter {
    /// Requests main-content-only markdown for `url`.
    async fn fetch_page(&self, url: &str) -> PortResult<ScrapedPage> {
        let formatted_url = normalize_url(url);
        info!("Scraping URL: {}", formatted_url);

        let response = self
            .http
            .post(format!("{}/scrape", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&ScrapeRequest {
                url: &formatted_url,
                formats: ["markdown"],
                only_main_content: true,
            })
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let status = response.status();
        let body: ScrapeResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if !status.is_success() {
            let message = body.error.unwrap_or_else(|| SCRAPE_FAILED.to_string());
            error!("Firecrawl error ({}): {}", status, message);
            return Err(PortError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body.into_page())
    }
}
