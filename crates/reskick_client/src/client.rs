//! crates/reskick_client/src/client.rs
//!
//! `ApiClient` speaks the `api` service's JSON protocol and implements every
//! client-side port: the two proxies, the record store and the auth service.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use reskick_core::{
    domain::{
        Account, AccountStats, NewNote, NewSummary, Note, ScrapedPage, Session, Summary,
        SummaryStyle,
    },
    ports::{
        AuthService, ContentFetchService, PortResult, RecordStore, SummarizationService,
    },
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{config::ClientConfig, error::ClientError, wire};

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.config.endpoint(path))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.config.endpoint(path))
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        self.http.delete(self.config.endpoint(path))
    }

    /// Sends the request and returns the body of a 2xx answer; anything else
    /// becomes `ClientError::Status` carrying the body's `error` message.
    async fn execute(&self, request: RequestBuilder) -> Result<Vec<u8>, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<wire::ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });
            warn!("API answered {}: {}", status, message);
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body.to_vec())
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let body = self.execute(request).await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::Malformed(e.to_string()))
    }
}

//=========================================================================================
// Proxy Ports
//=========================================================================================

#[async_trait]
impl ContentFetchService for ApiClient {
    async fn fetch_page(&self, url: &str) -> PortResult<ScrapedPage> {
        debug!("Requesting page content for {}", url);
        let page: wire::ScrapeUrlResponse = self
            .fetch_json(self.post("/scrape-url").json(&wire::ScrapeUrlRequest { url }))
            .await?;
        Ok(ScrapedPage {
            content: page.content,
            title: page.title,
        })
    }
}

#[async_trait]
impl SummarizationService for ApiClient {
    async fn summarize(&self, text: &str, style: &SummaryStyle) -> PortResult<String> {
        let response: wire::SummarizeResponse = self
            .fetch_json(self.post("/summarize").json(&wire::SummarizeRequest {
                text,
                style: style.key(),
            }))
            .await?;
        Ok(response.summary)
    }
}

//=========================================================================================
// Record Store
//=========================================================================================

#[async_trait]
impl RecordStore for ApiClient {
    async fn insert_summary(&self, session: &Session, summary: NewSummary) -> PortResult<Summary> {
        let saved: wire::SummaryResponse = self
            .fetch_json(
                self.post("/summaries")
                    .bearer_auth(&session.access_token)
                    .json(&wire::CreateSummaryRequest::from(&summary)),
            )
            .await?;
        saved.into_domain()
    }

    async fn list_summaries(&self, session: &Session, limit: usize) -> PortResult<Vec<Summary>> {
        let rows: Vec<wire::SummaryResponse> = self
            .fetch_json(
                self.get("/summaries")
                    .bearer_auth(&session.access_token)
                    .query(&[("limit", limit)]),
            )
            .await?;
        rows.into_iter().map(wire::SummaryResponse::into_domain).collect()
    }

    async fn delete_summary(&self, session: &Session, summary_id: Uuid) -> PortResult<()> {
        self.execute(
            self.delete(&format!("/summaries/{}", summary_id))
                .bearer_auth(&session.access_token),
        )
        .await?;
        Ok(())
    }

    async fn insert_note(&self, session: &Session, note: NewNote) -> PortResult<Note> {
        let saved: wire::NoteResponse = self
            .fetch_json(
                self.post("/notes")
                    .bearer_auth(&session.access_token)
                    .json(&wire::CreateNoteRequest::from(&note)),
            )
            .await?;
        Ok(saved.into())
    }

    async fn list_notes(&self, session: &Session, limit: usize) -> PortResult<Vec<Note>> {
        let rows: Vec<wire::NoteResponse> = self
            .fetch_json(
                self.get("/notes")
                    .bearer_auth(&session.access_token)
                    .query(&[("limit", limit)]),
            )
            .await?;
        Ok(rows.into_iter().map(Note::from).collect())
    }

    async fn delete_note(&self, session: &Session, note_id: Uuid) -> PortResult<()> {
        self.execute(
            self.delete(&format!("/notes/{}", note_id))
                .bearer_auth(&session.access_token),
        )
        .await?;
        Ok(())
    }

    async fn stats(&self, session: &Session) -> PortResult<AccountStats> {
        let stats: wire::StatsResponse = self
            .fetch_json(self.get("/stats").bearer_auth(&session.access_token))
            .await?;
        Ok(stats.into())
    }
}

//=========================================================================================
// Auth
//=========================================================================================

#[async_trait]
impl AuthService for ApiClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        email_redirect_to: Option<&str>,
    ) -> PortResult<Account> {
        let account: wire::AccountResponse = self
            .fetch_json(self.post("/auth/signup").json(&wire::SignupRequest {
                email,
                password,
                email_redirect_to,
            }))
            .await?;
        Ok(account.into())
    }

    async fn sign_in(&self, email: &str, password: &str) -> PortResult<Session> {
        let login: wire::LoginResponse = self
            .fetch_json(
                self.post("/auth/login")
                    .json(&wire::LoginRequest { email, password }),
            )
            .await?;
        Ok(login.into())
    }

    async fn sign_out(&self, session: &Session) -> PortResult<()> {
        self.execute(self.post("/auth/logout").bearer_auth(&session.access_token))
            .await?;
        Ok(())
    }
}
