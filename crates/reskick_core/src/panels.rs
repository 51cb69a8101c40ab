//! crates/reskick_core/src/panels.rs
//!
//! View models for the history and notes tabs. Both list the signed-in
//! account's newest rows and support per-row deletion.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{Note, Session, Summary, PANEL_PAGE_SIZE};
use crate::notify::{Notifier, Toast};
use crate::ports::{PortResult, RecordStore};

//=========================================================================================
// Panel Sources
//=========================================================================================

/// The kind of row a panel lists.
#[async_trait]
pub trait PanelSource: Send + Sync {
    type Item: Clone + Send + Sync;

    /// Title of the toast raised when a delete fails.
    const DELETE_ERROR_TITLE: &'static str;

    fn id_of(item: &Self::Item) -> Uuid;

    async fn list(&self, session: &Session, limit: usize) -> PortResult<Vec<Self::Item>>;

    async fn delete(&self, session: &Session, id: Uuid) -> PortResult<()>;
}

pub struct SummarySource(pub Arc<dyn RecordStore>);

#[async_trait]
impl PanelSource for SummarySource {
    type Item = Summary;
    const DELETE_ERROR_TITLE: &'static str = "Lỗi xóa";

    fn id_of(item: &Summary) -> Uuid {
        item.id
    }

    async fn list(&self, session: &Session, limit: usize) -> PortResult<Vec<Summary>> {
        self.0.list_summaries(session, limit).await
    }

    async fn delete(&self, session: &Session, id: Uuid) -> PortResult<()> {
        self.0.delete_summary(session, id).await
    }
}

pub struct NoteSource(pub Arc<dyn RecordStore>);

#[async_trait]
impl PanelSource for NoteSource {
    type Item = Note;
    const DELETE_ERROR_TITLE: &'static str = "Lỗi";

    fn id_of(item: &Note) -> Uuid {
        item.id
    }

    async fn list(&self, session: &Session, limit: usize) -> PortResult<Vec<Note>> {
        self.0.list_notes(session, limit).await
    }

    async fn delete(&self, session: &Session, id: Uuid) -> PortResult<()> {
        self.0.delete_note(session, id).await
    }
}

//=========================================================================================
// RecordPanel
//=========================================================================================

/// What the panel should draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView<T> {
    SignInPrompt,
    Loading,
    Empty,
    Items(Vec<T>),
}

struct PanelState<T> {
    items: Vec<T>,
    loading: bool,
    signed_in: bool,
    loaded_token: Option<u64>,
    loaded_account: Option<Uuid>,
    selected: Option<Uuid>,
}

pub struct RecordPanel<S: PanelSource> {
    source: S,
    notifier: Arc<dyn Notifier>,
    state: Mutex<PanelState<S::Item>>,
}

pub type HistoryPanel = RecordPanel<SummarySource>;
pub type NotesPanel = RecordPanel<NoteSource>;

impl HistoryPanel {
    pub fn history(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(SummarySource(store), notifier)
    }
}

impl NotesPanel {
    pub fn notes(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(NoteSource(store), notifier)
    }
}

impl<S: PanelSource> RecordPanel<S> {
    pub fn new(source: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            source,
            notifier,
            state: Mutex::new(PanelState {
                items: Vec::new(),
                loading: true,
                signed_in: false,
                loaded_token: None,
                loaded_account: None,
                selected: None,
            }),
        }
    }

    /// Loads the list when the panel is first shown, when `refresh_token`
    /// differs from the one the current list was loaded with, or when another
    /// account signs in. The fetched list replaces whatever is held locally.
    pub async fn load(&self, session: Option<&Session>, refresh_token: u64) {
        let Some(session) = session else {
            let mut state = self.state.lock().await;
            state.signed_in = false;
            state.loading = false;
            state.items.clear();
            state.selected = None;
            state.loaded_token = None;
            state.loaded_account = None;
            return;
        };
        let account_id = session.account_id();

        {
            let mut state = self.state.lock().await;
            let same_account = state.loaded_account == Some(account_id);
            if state.signed_in && same_account && state.loaded_token == Some(refresh_token) {
                return;
            }
            if !same_account {
                state.items.clear();
                state.selected = None;
                state.loaded_token = None;
                state.loaded_account = Some(account_id);
            }
            state.signed_in = true;
            state.loading = true;
        }

        let fetched = self.source.list(session, PANEL_PAGE_SIZE).await;

        let mut state = self.state.lock().await;
        if state.loaded_account != Some(account_id) {
            // Another account signed in while this list was in flight.
            return;
        }
        match fetched {
            Ok(items) => {
                if let Some(selected) = state.selected {
                    if !items.iter().any(|item| S::id_of(item) == selected) {
                        state.selected = None;
                    }
                }
                state.items = items;
                state.loaded_token = Some(refresh_token);
            }
            Err(e) => warn!("Failed to load rows: {}", e),
        }
        state.loading = false;
    }

    /// Deletes one row remotely, then locally. A failed delete leaves the
    /// list untouched and raises an error toast.
    pub async fn delete(&self, session: &Session, id: Uuid) -> bool {
        match self.source.delete(session, id).await {
            Ok(()) => {
                let mut state = self.state.lock().await;
                state.items.retain(|item| S::id_of(item) != id);
                if state.selected == Some(id) {
                    state.selected = None;
                }
                true
            }
            Err(e) => {
                self.notifier
                    .notify(Toast::error(S::DELETE_ERROR_TITLE, e.user_message()));
                false
            }
        }
    }

    pub async fn view(&self) -> PanelView<S::Item> {
        let state = self.state.lock().await;
        if !state.signed_in && !state.loading {
            PanelView::SignInPrompt
        } else if state.loading {
            PanelView::Loading
        } else if state.items.is_empty() {
            PanelView::Empty
        } else {
            PanelView::Items(state.items.clone())
        }
    }

    /// Opens the detail view for a row that is currently listed.
    pub async fn select(&self, id: Uuid) -> bool {
        let mut state = self.state.lock().await;
        if state.items.iter().any(|item| S::id_of(item) == id) {
            state.selected = Some(id);
            true
        } else {
            false
        }
    }

    pub async fn clear_selection(&self) {
        self.state.lock().await.selected = None;
    }

    pub async fn selected(&self) -> Option<S::Item> {
        let state = self.state.lock().await;
        let id = state.selected?;
        state.items.iter().find(|item| S::id_of(item) == id).cloned()
    }
}

//=========================================================================================
// Date Labels
//=========================================================================================

const DAY_SECONDS: i64 = 86_400;

/// Relative date label for a history row: "Hôm nay, HH:MM", "Hôm qua", or the date.
pub fn history_date_label(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let local = created_at.with_timezone(&Local);
    match (now - created_at).num_seconds() {
        s if s < DAY_SECONDS => format!("Hôm nay, {}", local.format("%H:%M")),
        s if s < 2 * DAY_SECONDS => "Hôm qua".to_string(),
        _ => local.format("%d/%m/%Y").to_string(),
    }
}

/// Relative date label for a note: "Hôm nay", "Hôm qua", or the date.
pub fn note_date_label(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    match (now - created_at).num_seconds() {
        s if s < DAY_SECONDS => "Hôm nay".to_string(),
        s if s < 2 * DAY_SECONDS => "Hôm qua".to_string(),
        _ => created_at.with_timezone(&Local).format("%d/%m/%Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewNote, NewSummary, SummaryInput, SummaryStyle};
    use crate::notify::ToastQueue;
    use crate::test_support::{session, FakeStore};
    use chrono::Duration;

    async fn seed_summaries(store: &FakeStore, session: &Session, count: usize) {
        for i in 0..count {
            store
                .insert_summary(
                    session,
                    NewSummary {
                        input: SummaryInput::Text(format!("article {i}")),
                        style: SummaryStyle::Detailed,
                        summary: format!("summary {i}"),
                    },
                )
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn signed_out_panel_prompts_without_fetching() {
        let store = Arc::new(FakeStore::default());
        let panel = HistoryPanel::history(store.clone(), Arc::new(ToastQueue::new()));

        panel.load(None, 0).await;

        assert_eq!(panel.view().await, PanelView::SignInPrompt);
        assert_eq!(store.list_calls(), 0);
    }

    #[tokio::test]
    async fn lists_newest_first_and_caps_at_page_size() {
        let store = Arc::new(FakeStore::default());
        let session = session();
        seed_summaries(&store, &session, 55).await;
        let panel = HistoryPanel::history(store, Arc::new(ToastQueue::new()));

        panel.load(Some(&session), 0).await;

        let PanelView::Items(items) = panel.view().await else {
            panic!("expected items");
        };
        assert_eq!(items.len(), PANEL_PAGE_SIZE);
        assert_eq!(items[0].summary, "summary 54");
    }

    #[tokio::test]
    async fn successful_delete_removes_the_row_and_selection() {
        let store = Arc::new(FakeStore::default());
        let session = session();
        seed_summaries(&store, &session, 2).await;
        let panel = HistoryPanel::history(store, Arc::new(ToastQueue::new()));
        panel.load(Some(&session), 0).await;
        let PanelView::Items(items) = panel.view().await else {
            panic!("expected items");
        };
        let target = items[0].id;
        assert!(panel.select(target).await);

        assert!(panel.delete(&session, target).await);

        let PanelView::Items(items) = panel.view().await else {
            panic!("expected items");
        };
        assert_eq!(items.len(), 1);
        assert!(items.iter().all(|s| s.id != target));
        assert!(panel.selected().await.is_none());
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_row_and_reports() {
        let store = Arc::new(FakeStore::default());
        let toasts = Arc::new(ToastQueue::new());
        let session = session();
        store
            .insert_note(
                &session,
                NewNote {
                    summary_id: None,
                    content: "remember this".into(),
                },
            )
            .await
            .unwrap();
        let panel = NotesPanel::notes(store.clone(), toasts.clone());
        panel.load(Some(&session), 0).await;
        let before = panel.view().await;
        let PanelView::Items(items) = &before else {
            panic!("expected items");
        };
        store.fail_writes(true);

        assert!(!panel.delete(&session, items[0].id).await);

        assert_eq!(panel.view().await, before);
        assert_eq!(toasts.drain()[0].title, "Lỗi");
    }

    #[tokio::test]
    async fn reload_happens_only_when_the_token_changes() {
        let store = Arc::new(FakeStore::default());
        let session = session();
        let panel = NotesPanel::notes(store.clone(), Arc::new(ToastQueue::new()));

        panel.load(Some(&session), 3).await;
        panel.load(Some(&session), 3).await;
        assert_eq!(store.list_calls(), 1);
        assert_eq!(panel.view().await, PanelView::Empty);

        panel.load(Some(&session), 4).await;
        assert_eq!(store.list_calls(), 2);
    }

    #[tokio::test]
    async fn another_account_never_sees_the_previous_rows() {
        let store = Arc::new(FakeStore::default());
        let first = session();
        let second = session();
        seed_summaries(&store, &first, 1).await;
        let panel = HistoryPanel::history(store.clone(), Arc::new(ToastQueue::new()));
        panel.load(Some(&first), 0).await;
        let PanelView::Items(items) = panel.view().await else {
            panic!("expected items");
        };
        assert!(panel.select(items[0].id).await);

        panel.load(Some(&second), 0).await;

        assert_eq!(store.list_calls(), 2);
        assert_eq!(panel.view().await, PanelView::Empty);
        assert!(panel.selected().await.is_none());
    }

    #[tokio::test]
    async fn reload_reconciles_with_the_remote_list() {
        let store = Arc::new(FakeStore::default());
        let session = session();
        seed_summaries(&store, &session, 1).await;
        let panel = HistoryPanel::history(store.clone(), Arc::new(ToastQueue::new()));
        panel.load(Some(&session), 0).await;

        seed_summaries(&store, &session, 1).await;
        panel.load(Some(&session), 1).await;

        let PanelView::Items(items) = panel.view().await else {
            panic!("expected items");
        };
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn relative_date_labels() {
        let now = Utc::now();
        assert!(history_date_label(now - Duration::hours(2), now).starts_with("Hôm nay, "));
        assert_eq!(note_date_label(now - Duration::hours(2), now), "Hôm nay");
        assert_eq!(note_date_label(now - Duration::hours(30), now), "Hôm qua");
        assert_eq!(history_date_label(now - Duration::hours(30), now), "Hôm qua");
        assert_eq!(note_date_label(now - Duration::days(5), now).len(), 10);
    }
}
