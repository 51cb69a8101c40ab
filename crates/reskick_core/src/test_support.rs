//! In-memory fakes for the port traits, shared by the view-model tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::domain::{
    Account, AccountStats, NewNote, NewSummary, Note, ScrapedPage, Session, Summary,
    SummaryStyle,
};
use crate::ports::{
    AuthService, ContentFetchService, PortError, PortResult, RecordStore, SummarizationService,
};

pub fn session() -> Session {
    Session {
        account: Account {
            id: Uuid::new_v4(),
            email: "hs@example.com".into(),
        },
        access_token: "token".into(),
    }
}

//=========================================================================================
// Fetcher
//=========================================================================================

#[derive(Default)]
pub struct FakeFetcher {
    responses: Mutex<VecDeque<PortResult<ScrapedPage>>>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn respond(&self, response: PortResult<ScrapedPage>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentFetchService for FakeFetcher {
    async fn fetch_page(&self, url: &str) -> PortResult<ScrapedPage> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PortError::Unexpected("no response queued".into())))
    }
}

//=========================================================================================
// Summarizer
//=========================================================================================

enum Reply {
    Fixed(String),
    Echo,
    Fail(PortError),
}

pub struct FakeSummarizer {
    reply: Mutex<Reply>,
    first_delay: Mutex<Option<Duration>>,
    first_failure: Mutex<Option<PortError>>,
    requests: Mutex<Vec<(String, SummaryStyle)>>,
}

impl FakeSummarizer {
    pub fn replying(summary: &str) -> Self {
        Self {
            reply: Mutex::new(Reply::Fixed(summary.to_string())),
            first_delay: Mutex::new(None),
            first_failure: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn echo_input(&self) {
        *self.reply.lock().unwrap() = Reply::Echo;
    }

    pub fn fail_with(&self, error: PortError) {
        *self.reply.lock().unwrap() = Reply::Fail(error);
    }

    /// Delays only the first request, so a later one can overtake it.
    pub fn delay_first(&self, delay: Duration) {
        *self.first_delay.lock().unwrap() = Some(delay);
    }

    /// Fails only the first request, after `delay`.
    pub fn fail_first(&self, error: PortError, delay: Duration) {
        *self.first_failure.lock().unwrap() = Some(error);
        self.delay_first(delay);
    }

    pub fn requests(&self) -> Vec<(String, SummaryStyle)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SummarizationService for FakeSummarizer {
    async fn summarize(&self, text: &str, style: &SummaryStyle) -> PortResult<String> {
        self.requests
            .lock()
            .unwrap()
            .push((text.to_string(), style.clone()));
        let delay = self.first_delay.lock().unwrap().take();
        let failure = self.first_failure.lock().unwrap().take();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = failure {
            return Err(error);
        }
        match &*self.reply.lock().unwrap() {
            Reply::Fixed(summary) => Ok(summary.clone()),
            Reply::Echo => Ok(format!("summary of: {text}")),
            Reply::Fail(error) => Err(error.clone()),
        }
    }
}

//=========================================================================================
// Store
//=========================================================================================

#[derive(Default)]
struct StoreRows {
    summaries: Vec<Summary>,
    notes: Vec<Note>,
    clock: i64,
}

impl StoreRows {
    fn tick(&mut self) -> chrono::DateTime<Utc> {
        self.clock += 1;
        Utc.timestamp_opt(1_700_000_000 + self.clock, 0).unwrap()
    }
}

#[derive(Default)]
pub struct FakeStore {
    rows: Mutex<StoreRows>,
    fail_writes: Mutex<bool>,
    insert_calls: Mutex<usize>,
    list_calls: Mutex<usize>,
}

impl FakeStore {
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn summaries(&self) -> Vec<Summary> {
        self.rows.lock().unwrap().summaries.clone()
    }

    pub fn notes(&self) -> Vec<Note> {
        self.rows.lock().unwrap().notes.clone()
    }

    pub fn insert_calls(&self) -> usize {
        *self.insert_calls.lock().unwrap()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    fn check_writable(&self) -> PortResult<()> {
        if *self.fail_writes.lock().unwrap() {
            Err(PortError::Unexpected("store unavailable".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn insert_summary(&self, session: &Session, summary: NewSummary) -> PortResult<Summary> {
        *self.insert_calls.lock().unwrap() += 1;
        self.check_writable()?;
        let mut rows = self.rows.lock().unwrap();
        let created_at = rows.tick();
        let stored = Summary {
            id: Uuid::new_v4(),
            account_id: session.account_id(),
            input: summary.input,
            style: summary.style,
            summary: summary.summary,
            created_at,
        };
        rows.summaries.push(stored.clone());
        Ok(stored)
    }

    async fn list_summaries(&self, session: &Session, limit: usize) -> PortResult<Vec<Summary>> {
        *self.list_calls.lock().unwrap() += 1;
        let rows = self.rows.lock().unwrap();
        let mut owned: Vec<Summary> = rows
            .summaries
            .iter()
            .filter(|s| s.account_id == session.account_id())
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        owned.truncate(limit);
        Ok(owned)
    }

    async fn delete_summary(&self, session: &Session, summary_id: Uuid) -> PortResult<()> {
        self.check_writable()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.summaries.len();
        rows.summaries
            .retain(|s| !(s.id == summary_id && s.account_id == session.account_id()));
        if rows.summaries.len() == before {
            return Err(PortError::NotFound(summary_id.to_string()));
        }
        Ok(())
    }

    async fn insert_note(&self, session: &Session, note: NewNote) -> PortResult<Note> {
        *self.insert_calls.lock().unwrap() += 1;
        self.check_writable()?;
        let mut rows = self.rows.lock().unwrap();
        let created_at = rows.tick();
        let stored = Note {
            id: Uuid::new_v4(),
            account_id: session.account_id(),
            summary_id: note.summary_id,
            content: note.content,
            created_at,
        };
        rows.notes.push(stored.clone());
        Ok(stored)
    }

    async fn list_notes(&self, session: &Session, limit: usize) -> PortResult<Vec<Note>> {
        *self.list_calls.lock().unwrap() += 1;
        let rows = self.rows.lock().unwrap();
        let mut owned: Vec<Note> = rows
            .notes
            .iter()
            .filter(|n| n.account_id == session.account_id())
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        owned.truncate(limit);
        Ok(owned)
    }

    async fn delete_note(&self, session: &Session, note_id: Uuid) -> PortResult<()> {
        self.check_writable()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.notes.len();
        rows.notes
            .retain(|n| !(n.id == note_id && n.account_id == session.account_id()));
        if rows.notes.len() == before {
            return Err(PortError::NotFound(note_id.to_string()));
        }
        Ok(())
    }

    async fn stats(&self, session: &Session) -> PortResult<AccountStats> {
        let rows = self.rows.lock().unwrap();
        let owner = session.account_id();
        Ok(AccountStats {
            summaries: rows.summaries.iter().filter(|s| s.account_id == owner).count() as u64,
            notes: rows.notes.iter().filter(|n| n.account_id == owner).count() as u64,
        })
    }
}

//=========================================================================================
// Auth
//=========================================================================================

#[derive(Default)]
pub struct FakeAuth {
    reject: bool,
    last_redirect: Mutex<Option<String>>,
    sign_in_calls: Mutex<usize>,
    sign_out_calls: Mutex<usize>,
}

impl FakeAuth {
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub fn last_redirect(&self) -> Option<String> {
        self.last_redirect.lock().unwrap().clone()
    }

    pub fn sign_in_calls(&self) -> usize {
        *self.sign_in_calls.lock().unwrap()
    }

    pub fn sign_out_calls(&self) -> usize {
        *self.sign_out_calls.lock().unwrap()
    }
}

#[async_trait]
impl AuthService for FakeAuth {
    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        email_redirect_to: Option<&str>,
    ) -> PortResult<Account> {
        *self.last_redirect.lock().unwrap() = email_redirect_to.map(str::to_string);
        if self.reject {
            return Err(PortError::Conflict("Email already registered".into()));
        }
        Ok(Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
        })
    }

    async fn sign_in(&self, email: &str, _password: &str) -> PortResult<Session> {
        *self.sign_in_calls.lock().unwrap() += 1;
        if self.reject {
            return Err(PortError::Unauthorized);
        }
        Ok(Session {
            account: Account {
                id: Uuid::new_v4(),
                email: email.to_string(),
            },
            access_token: Uuid::new_v4().to_string(),
        })
    }

    async fn sign_out(&self, _session: &Session) -> PortResult<()> {
        *self.sign_out_calls.lock().unwrap() += 1;
        Ok(())
    }
}
