//! services/api/src/web/proxy.rs
//!
//! The two public proxy endpoints: page scraping and summarization. Both are
//! thin wrappers that validate the payload and hand off to the configured
//! upstream adapter.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use reskick_core::domain::SummaryStyle;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::web::{
    rest::{failure, json_body, port_failure, ApiFailure, ErrorBody},
    state::AppState,
};

pub const URL_REQUIRED: &str = "URL is required";
pub const FIRECRAWL_NOT_CONFIGURED: &str = "Firecrawl not configured";
pub const TEXT_AND_STYLE_REQUIRED: &str = "text and style are required";
pub const GATEWAY_KEY_NOT_CONFIGURED: &str = "AI_GATEWAY_API_KEY is not configured";

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct ScrapeUrlRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ScrapeUrlResponse {
    pub content: String,
    pub title: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct SummarizeResponse {
    pub summary: String,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /scrape-url - Fetch the readable main content of a page
#[utoipa::path(
    post,
    path = "/scrape-url",
    request_body = ScrapeUrlRequest,
    responses(
        (status = 200, description = "Page content as markdown", body = ScrapeUrlResponse),
        (status = 400, description = "Missing URL", body = ErrorBody),
        (status = 500, description = "Scraper not configured or failed", body = ErrorBody)
    )
)]
pub async fn scrape_url_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ScrapeUrlRequest>, JsonRejection>,
) -> Result<Json<ScrapeUrlResponse>, ApiFailure> {
    let request = json_body(payload)?;
    let url = present(request.url).ok_or_else(|| failure(StatusCode::BAD_REQUEST, URL_REQUIRED))?;

    let fetcher = state
        .fetcher
        .as_ref()
        .ok_or_else(|| failure(StatusCode::INTERNAL_SERVER_ERROR, FIRECRAWL_NOT_CONFIGURED))?;

    let page = fetcher.fetch_page(&url).await.map_err(port_failure)?;
    info!("Scraped {} characters", page.content.chars().count());

    Ok(Json(ScrapeUrlResponse {
        content: page.content,
        title: page.title,
    }))
}

/// POST /summarize - Summarize an English text in Vietnamese
///
/// Unknown styles are summarized with the concise instructions unless the
/// server runs with `STRICT_STYLE`, in which case they are rejected.
#[utoipa::path(
    post,
    path = "/summarize",
    request_body = SummarizeRequest,
    responses(
        (status = 200, description = "The generated summary", body = SummarizeResponse),
        (status = 400, description = "Missing text or style", body = ErrorBody),
        (status = 402, description = "AI credits exhausted", body = ErrorBody),
        (status = 429, description = "Rate limited", body = ErrorBody),
        (status = 500, description = "Gateway not configured or failed", body = ErrorBody)
    )
)]
pub async fn summarize_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummarizeResponse>, ApiFailure> {
    let request = json_body(payload)?;
    let (Some(text), Some(style)) = (present(request.text), present(request.style)) else {
        return Err(failure(StatusCode::BAD_REQUEST, TEXT_AND_STYLE_REQUIRED));
    };

    let style = SummaryStyle::from_key(&style);
    if state.config.strict_style && !style.is_known() {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            format!("Unknown summary style: {}", style),
        ));
    }

    let summarizer = state
        .summarizer
        .as_ref()
        .ok_or_else(|| failure(StatusCode::INTERNAL_SERVER_ERROR, GATEWAY_KEY_NOT_CONFIGURED))?;

    let summary = summarizer
        .summarize(&text, &style)
        .await
        .map_err(port_failure)?;

    Ok(Json(SummarizeResponse { summary }))
}

/// Answers a bare `OPTIONS` on the proxy paths. Real preflights are handled
/// by the CORS layer before they reach this handler.
pub async fn options_handler() -> StatusCode {
    StatusCode::OK
}
