//! crates/reskick_core/src/orchestrator.rs
//!
//! The summarization view model: collects the user's input, fetches page
//! content for URLs, calls the summarization proxy, stores the result for
//! signed-in accounts and captures quick notes against it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    truncate_chars, InputMode, NewNote, NewSummary, Session, SummaryInput, SummaryStyle,
    MAX_STORED_INPUT_CHARS, MAX_SUMMARY_INPUT_CHARS, MIN_FETCHED_CONTENT_CHARS,
};
use crate::notify::{Notifier, Toast, ToastVariant};
use crate::ports::{ContentFetchService, PortError, RecordStore, SummarizationService};
use crate::shell::RefreshSignal;

const FETCH_FAILED_TITLE: &str = "Lỗi lấy nội dung";
const FETCH_TOO_SHORT: &str = "Không thể lấy nội dung từ URL này. Hãy thử dán trực tiếp văn bản.";
const SUMMARIZE_FAILED_TITLE: &str = "Lỗi tóm tắt";
const SAVE_SUMMARY_FAILED_TITLE: &str = "Lỗi lưu bài tóm tắt";
const NOTE_SIGN_IN_REQUIRED: &str = "Hãy đăng nhập để lưu ghi chú";
const NOTE_SAVE_FAILED_TITLE: &str = "Lỗi lưu ghi chú";

/// What the pipeline is currently waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Fetching,
    Summarizing,
}

impl Phase {
    /// Label for the submit button in this phase.
    pub fn button_label(&self) -> &'static str {
        match self {
            Self::Idle => "Tóm tắt ngay",
            Self::Fetching => "Đang lấy nội dung...",
            Self::Summarizing => "Đang tóm tắt...",
        }
    }
}

/// Errors returned by [`SummaryOrchestrator::summarize`]. Each one has
/// already been reported through the notifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummarizeError {
    #[error("nothing to summarize")]
    EmptyInput,
    #[error("{0}")]
    Fetch(String),
    #[error("{0}")]
    Summarize(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarizeOutcome {
    /// The summary is on screen. `saved_id` is set when it was persisted.
    Completed {
        summary: String,
        saved_id: Option<Uuid>,
    },
    /// A newer request was started while this one was in flight; its
    /// response was dropped.
    Superseded,
}

/// Rendering snapshot of the summarize tab.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryView {
    pub input_mode: InputMode,
    pub text_input: String,
    pub url_input: String,
    pub style: SummaryStyle,
    pub phase: Phase,
    pub result: Option<String>,
    pub current_summary_id: Option<Uuid>,
    pub note_draft: String,
    pub note_saved: bool,
}

impl SummaryView {
    fn has_input(&self) -> bool {
        match self.input_mode {
            InputMode::Text => !self.text_input.trim().is_empty(),
            InputMode::Url => !self.url_input.trim().is_empty(),
        }
    }
}

pub struct SummaryOrchestrator {
    fetcher: Arc<dyn ContentFetchService>,
    summarizer: Arc<dyn SummarizationService>,
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
    refresh: RefreshSignal,
    latest_ticket: AtomicU64,
    state: Mutex<SummaryView>,
}

impl SummaryOrchestrator {
    pub fn new(
        fetcher: Arc<dyn ContentFetchService>,
        summarizer: Arc<dyn SummarizationService>,
        store: Arc<dyn RecordStore>,
        notifier: Arc<dyn Notifier>,
        refresh: RefreshSignal,
    ) -> Self {
        Self {
            fetcher,
            summarizer,
            store,
            notifier,
            refresh,
            latest_ticket: AtomicU64::new(0),
            state: Mutex::new(SummaryView::default()),
        }
    }

    pub async fn view(&self) -> SummaryView {
        self.state.lock().await.clone()
    }

    /// Switching input tabs hides the previous result.
    pub async fn set_input_mode(&self, mode: InputMode) {
        let mut state = self.state.lock().await;
        state.input_mode = mode;
        state.result = None;
    }

    pub async fn set_text(&self, text: impl Into<String>) {
        self.state.lock().await.text_input = text.into();
    }

    pub async fn set_url(&self, url: impl Into<String>) {
        self.state.lock().await.url_input = url.into();
    }

    pub async fn set_style(&self, style: SummaryStyle) {
        self.state.lock().await.style = style;
    }

    pub async fn set_note_draft(&self, note: impl Into<String>) {
        self.state.lock().await.note_draft = note.into();
    }

    pub async fn phase(&self) -> Phase {
        self.state.lock().await.phase
    }

    pub async fn can_submit(&self) -> bool {
        let state = self.state.lock().await;
        state.has_input() && state.phase == Phase::Idle
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.latest_ticket.load(Ordering::SeqCst) == ticket
    }

    /// Runs the fetch → summarize → persist pipeline for the current input.
    ///
    /// Persistence only happens when `session` is present, and a failure to
    /// persist never hides the summary that is already on screen.
    pub async fn summarize(
        &self,
        session: Option<&Session>,
    ) -> Result<SummarizeOutcome, SummarizeError> {
        // Empty input is rejected before it can supersede a request in flight.
        let (ticket, mode, text_input, url_input, style) = {
            let mut state = self.state.lock().await;
            if !state.has_input() {
                return Err(SummarizeError::EmptyInput);
            }
            if state.input_mode == InputMode::Url {
                state.phase = Phase::Fetching;
            }
            (
                self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1,
                state.input_mode,
                state.text_input.clone(),
                state.url_input.clone(),
                state.style.clone(),
            )
        };

        let content = match mode {
            InputMode::Text => text_input.clone(),
            InputMode::Url => {
                match self.fetch_content(&url_input).await {
                    Ok(content) => content,
                    Err(message) => {
                        if !self.is_latest(ticket) {
                            info!(ticket, "Dropping fetch failure from a superseded request");
                            return Ok(SummarizeOutcome::Superseded);
                        }
                        self.state.lock().await.phase = Phase::Idle;
                        self.notifier
                            .notify(Toast::error(FETCH_FAILED_TITLE, message.clone()));
                        return Err(SummarizeError::Fetch(message));
                    }
                }
            }
        };

        if !self.is_latest(ticket) {
            return Ok(SummarizeOutcome::Superseded);
        }
        {
            let mut state = self.state.lock().await;
            state.phase = Phase::Summarizing;
            state.result = None;
            state.note_saved = false;
            state.current_summary_id = None;
        }

        let payload = truncate_chars(&content, MAX_SUMMARY_INPUT_CHARS);
        let summary = match self.summarizer.summarize(payload, &style).await {
            Ok(summary) => summary,
            Err(e) => {
                if !self.is_latest(ticket) {
                    info!(ticket, "Dropping summarize failure from a superseded request");
                    return Ok(SummarizeOutcome::Superseded);
                }
                let message = e.user_message();
                self.state.lock().await.phase = Phase::Idle;
                self.notifier
                    .notify(Toast::error(SUMMARIZE_FAILED_TITLE, message.clone()));
                return Err(SummarizeError::Summarize(message));
            }
        };

        if !self.is_latest(ticket) {
            info!(ticket, "Dropping summary from a superseded request");
            return Ok(SummarizeOutcome::Superseded);
        }
        self.state.lock().await.result = Some(summary.clone());

        let mut saved_id = None;
        if let Some(session) = session {
            let input = match mode {
                InputMode::Text => SummaryInput::Text(
                    truncate_chars(&text_input, MAX_STORED_INPUT_CHARS).to_string(),
                ),
                InputMode::Url => SummaryInput::Url(url_input),
            };
            let new_summary = NewSummary {
                input,
                style,
                summary: summary.clone(),
            };
            match self.store.insert_summary(session, new_summary).await {
                Ok(stored) => {
                    saved_id = Some(stored.id);
                    if self.is_latest(ticket) {
                        self.state.lock().await.current_summary_id = Some(stored.id);
                    }
                    self.refresh.bump();
                }
                Err(e) => {
                    warn!("Failed to store summary: {}", e);
                    self.notifier
                        .notify(Toast::error(SAVE_SUMMARY_FAILED_TITLE, e.user_message()));
                }
            }
        }

        if self.is_latest(ticket) {
            self.state.lock().await.phase = Phase::Idle;
        }
        Ok(SummarizeOutcome::Completed { summary, saved_id })
    }

    async fn fetch_content(&self, url: &str) -> Result<String, String> {
        let page = self
            .fetcher
            .fetch_page(url)
            .await
            .map_err(|e: PortError| e.user_message())?;
        if page.content.trim().chars().count() < MIN_FETCHED_CONTENT_CHARS {
            return Err(FETCH_TOO_SHORT.to_string());
        }
        Ok(page.content)
    }

    /// Saves the quick-note draft, attached to the summary on screen if it was stored.
    /// Returns `true` when a note was written.
    pub async fn save_note(&self, session: Option<&Session>) -> bool {
        let (content, summary_id) = {
            let state = self.state.lock().await;
            (state.note_draft.trim().to_string(), state.current_summary_id)
        };
        if content.is_empty() {
            return false;
        }
        let Some(session) = session else {
            self.notifier.notify(Toast {
                variant: ToastVariant::Destructive,
                ..Toast::info(NOTE_SIGN_IN_REQUIRED)
            });
            return false;
        };

        match self
            .store
            .insert_note(session, NewNote { summary_id, content })
            .await
        {
            Ok(_) => {
                let mut state = self.state.lock().await;
                state.note_draft.clear();
                state.note_saved = true;
                drop(state);
                self.refresh.bump();
                true
            }
            Err(e) => {
                self.notifier
                    .notify(Toast::error(NOTE_SAVE_FAILED_TITLE, e.user_message()));
                false
            }
        }
    }

    /// Clears the "saved" checkmark on the note button.
    pub async fn acknowledge_note_saved(&self) {
        self.state.lock().await.note_saved = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScrapedPage;
    use crate::notify::ToastQueue;
    use crate::test_support::{session, FakeFetcher, FakeStore, FakeSummarizer};
    use std::time::Duration;

    struct Harness {
        fetcher: Arc<FakeFetcher>,
        summarizer: Arc<FakeSummarizer>,
        store: Arc<FakeStore>,
        toasts: Arc<ToastQueue>,
        refresh: RefreshSignal,
        orchestrator: Arc<SummaryOrchestrator>,
    }

    fn harness() -> Harness {
        let fetcher = Arc::new(FakeFetcher::default());
        let summarizer = Arc::new(FakeSummarizer::replying("Tóm tắt tiếng Việt"));
        let store = Arc::new(FakeStore::default());
        let toasts = Arc::new(ToastQueue::new());
        let refresh = RefreshSignal::new();
        let orchestrator = Arc::new(SummaryOrchestrator::new(
            fetcher.clone(),
            summarizer.clone(),
            store.clone(),
            toasts.clone(),
            refresh.clone(),
        ));
        Harness {
            fetcher,
            summarizer,
            store,
            toasts,
            refresh,
            orchestrator,
        }
    }

    #[tokio::test]
    async fn signed_in_text_summary_is_rendered_and_stored() {
        let h = harness();
        let session = session();
        h.orchestrator.set_text("The quick brown fox...").await;
        h.orchestrator.set_style(SummaryStyle::Easy).await;

        let outcome = h.orchestrator.summarize(Some(&session)).await.unwrap();

        let stored = h.store.summaries();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].input.mode(), InputMode::Text);
        assert_eq!(stored[0].style.key(), "easy");
        assert_eq!(
            outcome,
            SummarizeOutcome::Completed {
                summary: "Tóm tắt tiếng Việt".into(),
                saved_id: Some(stored[0].id),
            }
        );
        let view = h.orchestrator.view().await;
        assert_eq!(view.result.as_deref(), Some("Tóm tắt tiếng Việt"));
        assert_eq!(view.current_summary_id, Some(stored[0].id));
        assert_eq!(view.phase, Phase::Idle);
        assert_eq!(h.orchestrator.phase().await.button_label(), "Tóm tắt ngay");
        assert_eq!(h.refresh.current(), 1);
    }

    #[tokio::test]
    async fn signed_out_summary_is_rendered_but_never_stored() {
        let h = harness();
        h.orchestrator.set_text("Some English article").await;

        let outcome = h.orchestrator.summarize(None).await.unwrap();

        assert!(matches!(outcome, SummarizeOutcome::Completed { saved_id: None, .. }));
        assert_eq!(h.store.insert_calls(), 0);
        assert!(h.orchestrator.view().await.result.is_some());
    }

    #[tokio::test]
    async fn long_text_is_truncated_before_transmission() {
        let h = harness();
        h.orchestrator.set_text("á".repeat(12_000)).await;

        h.orchestrator.summarize(Some(&session())).await.unwrap();

        let sent = h.summarizer.requests();
        assert_eq!(sent[0].0.chars().count(), MAX_SUMMARY_INPUT_CHARS);
        let stored = h.store.summaries();
        assert_eq!(
            stored[0].input.text().map(|t| t.chars().count()),
            Some(MAX_STORED_INPUT_CHARS)
        );
    }

    #[tokio::test]
    async fn short_fetched_content_never_reaches_the_summarizer() {
        let h = harness();
        h.fetcher.respond(Ok(ScrapedPage {
            content: "   too short   ".into(),
            title: String::new(),
        }));
        h.orchestrator.set_input_mode(InputMode::Url).await;
        h.orchestrator.set_url("example.com/article").await;

        let err = h.orchestrator.summarize(None).await.unwrap_err();

        assert_eq!(err, SummarizeError::Fetch(FETCH_TOO_SHORT.into()));
        assert!(h.summarizer.requests().is_empty());
        let toasts = h.toasts.drain();
        assert_eq!(toasts[0].title, FETCH_FAILED_TITLE);
        assert_eq!(h.orchestrator.view().await.phase, Phase::Idle);
    }

    #[tokio::test]
    async fn url_summary_stores_the_url_not_the_content() {
        let h = harness();
        h.fetcher.respond(Ok(ScrapedPage {
            content: "word ".repeat(40),
            title: "Article".into(),
        }));
        h.orchestrator.set_input_mode(InputMode::Url).await;
        h.orchestrator.set_url("https://example.com/a").await;

        h.orchestrator.summarize(Some(&session())).await.unwrap();

        assert_eq!(h.fetcher.requests(), vec!["https://example.com/a".to_string()]);
        let stored = h.store.summaries();
        assert_eq!(
            stored[0].input,
            SummaryInput::Url("https://example.com/a".into())
        );
    }

    #[tokio::test]
    async fn rate_limit_message_is_surfaced_verbatim() {
        let h = harness();
        h.summarizer.fail_with(PortError::RateLimited(
            "Quá nhiều yêu cầu, vui lòng thử lại sau.".into(),
        ));
        h.orchestrator.set_text("text").await;

        let err = h.orchestrator.summarize(Some(&session())).await.unwrap_err();

        assert_eq!(
            err,
            SummarizeError::Summarize("Quá nhiều yêu cầu, vui lòng thử lại sau.".into())
        );
        let toasts = h.toasts.drain();
        assert_eq!(
            toasts[0].description.as_deref(),
            Some("Quá nhiều yêu cầu, vui lòng thử lại sau.")
        );
        assert_eq!(h.store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn failed_persistence_keeps_the_summary_on_screen() {
        let h = harness();
        h.store.fail_writes(true);
        h.orchestrator.set_text("text").await;

        let outcome = h.orchestrator.summarize(Some(&session())).await.unwrap();

        assert!(matches!(outcome, SummarizeOutcome::Completed { saved_id: None, .. }));
        assert!(h.orchestrator.view().await.result.is_some());
        assert_eq!(h.toasts.drain()[0].title, SAVE_SUMMARY_FAILED_TITLE);
        assert_eq!(h.refresh.current(), 0);
    }

    #[tokio::test]
    async fn stale_response_does_not_overwrite_newer_one() {
        let h = harness();
        h.summarizer.echo_input();
        h.summarizer.delay_first(Duration::from_millis(200));
        h.orchestrator.set_text("first").await;

        let slow = {
            let orchestrator = h.orchestrator.clone();
            tokio::spawn(async move { orchestrator.summarize(None).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        h.orchestrator.set_text("second").await;
        let fast = h.orchestrator.summarize(None).await.unwrap();

        let slow = slow.await.unwrap().unwrap();
        assert_eq!(slow, SummarizeOutcome::Superseded);
        assert!(matches!(fast, SummarizeOutcome::Completed { .. }));
        assert_eq!(
            h.orchestrator.view().await.result.as_deref(),
            Some("summary of: second")
        );
    }

    #[tokio::test]
    async fn empty_submit_does_not_strand_the_request_in_flight() {
        let h = harness();
        h.summarizer.delay_first(Duration::from_millis(100));
        h.orchestrator.set_text("first").await;

        let slow = {
            let orchestrator = h.orchestrator.clone();
            tokio::spawn(async move { orchestrator.summarize(None).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        h.orchestrator.set_text("   ").await;
        let empty = h.orchestrator.summarize(None).await;

        assert_eq!(empty, Err(SummarizeError::EmptyInput));
        let slow = slow.await.unwrap().unwrap();
        assert!(matches!(slow, SummarizeOutcome::Completed { .. }));
        assert_eq!(h.orchestrator.phase().await, Phase::Idle);
        h.orchestrator.set_text("third").await;
        assert!(h.orchestrator.can_submit().await);
    }

    #[tokio::test]
    async fn stale_failure_raises_no_toast_over_a_newer_summary() {
        let h = harness();
        h.summarizer.echo_input();
        h.summarizer.fail_first(
            PortError::RateLimited("Quá nhiều yêu cầu, vui lòng thử lại sau.".into()),
            Duration::from_millis(200),
        );
        h.orchestrator.set_text("first").await;

        let slow = {
            let orchestrator = h.orchestrator.clone();
            tokio::spawn(async move { orchestrator.summarize(None).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        h.orchestrator.set_text("second").await;
        let fast = h.orchestrator.summarize(None).await.unwrap();

        let slow = slow.await.unwrap();
        assert_eq!(slow, Ok(SummarizeOutcome::Superseded));
        assert!(matches!(fast, SummarizeOutcome::Completed { .. }));
        assert!(h.toasts.drain().is_empty());
        let view = h.orchestrator.view().await;
        assert_eq!(view.result.as_deref(), Some("summary of: second"));
        assert_eq!(view.phase, Phase::Idle);
    }

    #[tokio::test]
    async fn switching_input_mode_clears_the_result() {
        let h = harness();
        h.orchestrator.set_text("text").await;
        h.orchestrator.summarize(None).await.unwrap();

        h.orchestrator.set_input_mode(InputMode::Url).await;

        assert_eq!(h.orchestrator.view().await.result, None);
        assert!(!h.orchestrator.can_submit().await);
    }

    #[tokio::test]
    async fn note_is_attached_to_the_stored_summary() {
        let h = harness();
        let session = session();
        h.orchestrator.set_text("text").await;
        h.orchestrator.summarize(Some(&session)).await.unwrap();
        h.orchestrator.set_note_draft("  new word: ubiquitous  ").await;

        assert!(h.orchestrator.save_note(Some(&session)).await);

        let notes = h.store.notes();
        assert_eq!(notes[0].content, "new word: ubiquitous");
        assert_eq!(notes[0].summary_id, Some(h.store.summaries()[0].id));
        let view = h.orchestrator.view().await;
        assert!(view.note_saved);
        assert!(view.note_draft.is_empty());
    }

    #[tokio::test]
    async fn note_requires_a_session() {
        let h = harness();
        h.orchestrator.set_note_draft("idea").await;

        assert!(!h.orchestrator.save_note(None).await);

        assert_eq!(h.toasts.drain()[0].title, NOTE_SIGN_IN_REQUIRED);
        assert!(h.store.notes().is_empty());
    }

    #[tokio::test]
    async fn blank_note_is_ignored() {
        let h = harness();
        h.orchestrator.set_note_draft("   ").await;

        assert!(!h.orchestrator.save_note(Some(&session())).await);
        assert!(h.toasts.drain().is_empty());
    }
}
