//! crates/reskick_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Account, AccountCredentials, AccountStats, NewNote, NewSummary, Note, ScrapedPage,
    Session, Summary, SummaryStyle,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    RateLimited(String),
    #[error("{0}")]
    QuotaExhausted(String),
    #[error("{0}")]
    NotConfigured(String),
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    /// The single human-readable string shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Upstream { message, .. } => message.clone(),
            Self::Unexpected(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Proxy Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait ContentFetchService: Send + Sync {
    /// Retrieves the readable main content of the page at `url`.
    async fn fetch_page(&self, url: &str) -> PortResult<ScrapedPage>;
}

#[async_trait]
pub trait SummarizationService: Send + Sync {
    /// Produces a Vietnamese summary of `text` in the requested style.
    async fn summarize(&self, text: &str, style: &SummaryStyle) -> PortResult<String>;
}

//=========================================================================================
// Client-side Store and Auth Ports
//=========================================================================================

/// Row storage as seen by a signed-in account. Every call is scoped to the
/// account behind `session`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_summary(&self, session: &Session, summary: NewSummary) -> PortResult<Summary>;

    /// Newest first, at most `limit` rows.
    async fn list_summaries(&self, session: &Session, limit: usize) -> PortResult<Vec<Summary>>;

    async fn delete_summary(&self, session: &Session, summary_id: Uuid) -> PortResult<()>;

    async fn insert_note(&self, session: &Session, note: NewNote) -> PortResult<Note>;

    /// Newest first, at most `limit` rows.
    async fn list_notes(&self, session: &Session, limit: usize) -> PortResult<Vec<Note>>;

    async fn delete_note(&self, session: &Session, note_id: Uuid) -> PortResult<()>;

    async fn stats(&self, session: &Session) -> PortResult<AccountStats>;
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Registers an account. `email_redirect_to` is where the confirmation
    /// link should send the user back to.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        email_redirect_to: Option<&str>,
    ) -> PortResult<Account>;

    async fn sign_in(&self, email: &str, password: &str) -> PortResult<Session>;

    async fn sign_out(&self, session: &Session) -> PortResult<()>;
}

//=========================================================================================
// Server-side Persistence Port
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Account Management ---
    async fn create_account_with_email(
        &self,
        email: &str,
        hashed_password: &str,
        email_redirect_to: Option<&str>,
    ) -> PortResult<Account>;

    async fn get_credentials_by_email(&self, email: &str) -> PortResult<AccountCredentials>;

    // --- Auth Sessions ---
    async fn create_auth_session(
        &self,
        session_id: &str,
        account_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Returns the owning account of a live (unexpired) session.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Summaries ---
    async fn insert_summary(&self, account_id: Uuid, summary: NewSummary) -> PortResult<Summary>;

    async fn list_summaries(&self, account_id: Uuid, limit: usize) -> PortResult<Vec<Summary>>;

    /// Fails with `NotFound` when the row does not exist or belongs to another account.
    async fn delete_summary(&self, account_id: Uuid, summary_id: Uuid) -> PortResult<()>;

    // --- Notes ---
    async fn insert_note(&self, account_id: Uuid, note: NewNote) -> PortResult<Note>;

    async fn list_notes(&self, account_id: Uuid, limit: usize) -> PortResult<Vec<Note>>;

    /// Fails with `NotFound` when the row does not exist or belongs to another account.
    async fn delete_note(&self, account_id: Uuid, note_id: Uuid) -> PortResult<()>;

    async fn count_records(&self, account_id: Uuid) -> PortResult<AccountStats>;
}
