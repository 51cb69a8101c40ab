//! crates/reskick_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// Maximum number of characters forwarded to the summarization proxy.
pub const MAX_SUMMARY_INPUT_CHARS: usize = 10_000;

/// Maximum number of characters of pasted text kept on a stored summary.
pub const MAX_STORED_INPUT_CHARS: usize = 5_000;

/// Minimum length (after trimming) of fetched page content worth summarizing.
pub const MIN_FETCHED_CONTENT_CHARS: usize = 50;

/// Number of rows the history and notes views fetch at most.
pub const PANEL_PAGE_SIZE: usize = 50;

/// Minimum password length accepted by the sign-up/sign-in form.
pub const MIN_PASSWORD_CHARS: usize = 6;

// Represents an account - used throughout app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
}

/// A signed-in account together with the bearer token attached to every
/// store and auth call made on its behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub account: Account,
    pub access_token: String,
}

impl Session {
    pub fn account_id(&self) -> Uuid {
        self.account.id
    }
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub account_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

/// The verbosity/tone preset used to summarize a text.
///
/// Unknown keys are carried through as `Other` so they can be stored and
/// forwarded without interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SummaryStyle {
    Concise,
    Detailed,
    Easy,
    Other(String),
}

impl SummaryStyle {
    /// The presets offered in the style picker, in display order.
    pub const ALL: [SummaryStyle; 3] = [
        SummaryStyle::Concise,
        SummaryStyle::Detailed,
        SummaryStyle::Easy,
    ];

    /// Parses a style key. Never fails; unknown keys become `Other`.
    pub fn from_key(key: &str) -> Self {
        match key {
            "concise" => Self::Concise,
            "detailed" => Self::Detailed,
            "easy" => Self::Easy,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Concise => "concise",
            Self::Detailed => "detailed",
            Self::Easy => "easy",
            Self::Other(key) => key,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Badge label shown next to a summary. Unknown styles show their raw key.
    pub fn label(&self) -> &str {
        match self {
            Self::Concise => "Ngắn gọn",
            Self::Detailed => "Chi tiết",
            Self::Easy => "Dễ hiểu",
            Self::Other(key) => key,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Concise => "2-3 câu tóm tắt",
            Self::Detailed => "5-7 câu đầy đủ",
            Self::Easy => "Giải thích đơn giản",
            Self::Other(_) => "",
        }
    }
}

impl Default for SummaryStyle {
    fn default() -> Self {
        Self::Concise
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Whether a summarization request came from pasted text or a fetched URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Text,
    Url,
}

impl InputMode {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Url => "url",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "text" => Some(Self::Text),
            "url" => Some(Self::Url),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Nhập văn bản",
            Self::Url => "Dán link bài viết",
        }
    }
}

/// The original input of a stored summary. Exactly one of text or URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryInput {
    Text(String),
    Url(String),
}

impl SummaryInput {
    /// Rebuilds the input from the two nullable store columns.
    /// Returns `None` when the columns disagree with the mode.
    pub fn from_columns(
        mode: InputMode,
        input_text: Option<String>,
        input_url: Option<String>,
    ) -> Option<Self> {
        match (mode, input_text, input_url) {
            (InputMode::Text, Some(text), None) => Some(Self::Text(text)),
            (InputMode::Url, None, Some(url)) => Some(Self::Url(url)),
            _ => None,
        }
    }

    pub fn mode(&self) -> InputMode {
        match self {
            Self::Text(_) => InputMode::Text,
            Self::Url(_) => InputMode::Url,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Url(_) => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Text(_) => None,
        }
    }
}

/// A persisted summary owned by one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub id: Uuid,
    pub account_id: Uuid,
    pub input: SummaryInput,
    pub style: SummaryStyle,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl Summary {
    /// The line shown for this summary in the history list.
    pub fn headline(&self) -> String {
        match &self.input {
            SummaryInput::Url(url) if !url.is_empty() => url.clone(),
            SummaryInput::Text(text) if !text.is_empty() => text.chars().take(60).collect(),
            _ => "Bài tóm tắt".to_string(),
        }
    }
}

/// The fields needed to persist a new summary. Ownership comes from the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSummary {
    pub input: SummaryInput,
    pub style: SummaryStyle,
    pub summary: String,
}

/// A free-form note, optionally attached to a summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: Uuid,
    pub account_id: Uuid,
    pub summary_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub summary_id: Option<Uuid>,
    pub content: String,
}

/// Readable main content extracted from a web page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrapedPage {
    pub content: String,
    pub title: String,
}

/// Per-account counters shown in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountStats {
    pub summaries: u64,
    pub notes: u64,
}

/// Returns at most the first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
