//! JSON shapes exchanged with the `api` service.

use chrono::{DateTime, Utc};
use reskick_core::domain::{
    Account, AccountStats, InputMode, NewNote, NewSummary, Note, Session, Summary, SummaryInput,
    SummaryStyle,
};
use reskick_core::ports::{PortError, PortResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

//=========================================================================================
// Proxies
//=========================================================================================

#[derive(Serialize)]
pub struct ScrapeUrlRequest<'a> {
    pub url: &'a str,
}

#[derive(Deserialize)]
pub struct ScrapeUrlResponse {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Serialize)]
pub struct SummarizeRequest<'a> {
    pub text: &'a str,
    pub style: &'a str,
}

#[derive(Deserialize)]
pub struct SummarizeResponse {
    #[serde(default)]
    pub summary: String,
}

//=========================================================================================
// Auth
//=========================================================================================

#[derive(Serialize)]
pub struct SignupRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_redirect_to: Option<&'a str>,
}

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
pub struct AccountResponse {
    pub user_id: Uuid,
    pub email: String,
}

impl From<AccountResponse> for Account {
    fn from(wire: AccountResponse) -> Self {
        Account {
            id: wire.user_id,
            email: wire.email,
        }
    }
}

#[derive(Deserialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub email: String,
    pub access_token: String,
}

impl From<LoginResponse> for Session {
    fn from(wire: LoginResponse) -> Self {
        Session {
            account: Account {
                id: wire.user_id,
                email: wire.email,
            },
            access_token: wire.access_token,
        }
    }
}

//=========================================================================================
// Records
//=========================================================================================

#[derive(Serialize)]
pub struct CreateSummaryRequest<'a> {
    pub input_mode: &'static str,
    pub input_text: Option<&'a str>,
    pub input_url: Option<&'a str>,
    pub style: &'a str,
    pub summary: &'a str,
}

impl<'a> From<&'a NewSummary> for CreateSummaryRequest<'a> {
    fn from(summary: &'a NewSummary) -> Self {
        Self {
            input_mode: summary.input.mode().key(),
            input_text: summary.input.text(),
            input_url: summary.input.url(),
            style: summary.style.key(),
            summary: &summary.summary,
        }
    }
}

#[derive(Deserialize)]
pub struct SummaryResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub input_text: Option<String>,
    pub input_url: Option<String>,
    pub input_mode: String,
    pub style: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl SummaryResponse {
    pub fn into_domain(self) -> PortResult<Summary> {
        let input = InputMode::from_key(&self.input_mode)
            .and_then(|mode| SummaryInput::from_columns(mode, self.input_text, self.input_url))
            .ok_or_else(|| {
                PortError::Unexpected(format!("Summary {} has inconsistent input fields", self.id))
            })?;
        Ok(Summary {
            id: self.id,
            account_id: self.user_id,
            input,
            style: SummaryStyle::from_key(&self.style),
            summary: self.summary,
            created_at: self.created_at,
        })
    }
}

#[derive(Serialize)]
pub struct CreateNoteRequest<'a> {
    pub summary_id: Option<Uuid>,
    pub content: &'a str,
}

impl<'a> From<&'a NewNote> for CreateNoteRequest<'a> {
    fn from(note: &'a NewNote) -> Self {
        Self {
            summary_id: note.summary_id,
            content: &note.content,
        }
    }
}

#[derive(Deserialize)]
pub struct NoteResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub summary_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<NoteResponse> for Note {
    fn from(wire: NoteResponse) -> Self {
        Note {
            id: wire.id,
            account_id: wire.user_id,
            summary_id: wire.summary_id,
            content: wire.content,
            created_at: wire.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct StatsResponse {
    pub summaries: u64,
    pub notes: u64,
}

impl From<StatsResponse> for AccountStats {
    fn from(wire: StatsResponse) -> Self {
        AccountStats {
            summaries: wire.summaries,
            notes: wire.notes,
        }
    }
}
