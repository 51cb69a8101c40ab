//! crates/reskick_core/src/shell.rs
//!
//! Navigation shell: the active tab, the signed-in session, the sidebar stats,
//! and the refresh signal that tells the history and notes views to reload.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::warn;

use crate::domain::{AccountStats, Session};
use crate::ports::{AuthService, RecordStore};

/// A counter shared between the summarize tab and the list views. Every bump
/// marks the persisted lists as stale.
#[derive(Debug, Clone, Default)]
pub struct RefreshSignal(Arc<AtomicU64>);

impl RefreshSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Summary,
    Results,
    History,
    Notes,
    Suggestions,
}

impl Tab {
    /// Sidebar order.
    pub const ALL: [Tab; 5] = [
        Tab::Summary,
        Tab::Results,
        Tab::History,
        Tab::Notes,
        Tab::Suggestions,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Summary => "Tóm tắt AI",
            Self::Results => "Kết quả",
            Self::History => "Lịch sử",
            Self::Notes => "Ghi chú",
            Self::Suggestions => "Gợi ý đọc",
        }
    }
}

/// One counter tile in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatItem {
    pub label: &'static str,
    pub value: String,
    pub emoji: &'static str,
}

pub struct NavigationShell {
    store: Arc<dyn RecordStore>,
    auth: Arc<dyn AuthService>,
    refresh: RefreshSignal,
    active_tab: Tab,
    session: Option<Session>,
    stats: AccountStats,
}

impl NavigationShell {
    pub fn new(store: Arc<dyn RecordStore>, auth: Arc<dyn AuthService>) -> Self {
        Self {
            store,
            auth,
            refresh: RefreshSignal::new(),
            active_tab: Tab::default(),
            session: None,
            stats: AccountStats::default(),
        }
    }

    /// The signal handed to the summarize view so new rows reach the lists.
    pub fn refresh_signal(&self) -> RefreshSignal {
        self.refresh.clone()
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// The story box is only shown above the summarize tab.
    pub fn shows_story(&self) -> bool {
        self.active_tab == Tab::Summary
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub async fn sign_in(&mut self, session: Session) {
        self.session = Some(session);
        self.refresh.bump();
        self.reload_stats().await;
    }

    /// Ends the session remotely and locally. The local session is dropped
    /// even when the remote call fails.
    pub async fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = self.auth.sign_out(&session).await {
                warn!("Failed to end the remote session: {}", e);
            }
        }
        self.stats = AccountStats::default();
        self.refresh.bump();
    }

    pub async fn reload_stats(&mut self) {
        let Some(session) = self.session.as_ref() else {
            self.stats = AccountStats::default();
            return;
        };
        match self.store.stats(session).await {
            Ok(stats) => self.stats = stats,
            Err(e) => warn!("Failed to load account stats: {}", e),
        }
    }

    pub fn stat_items(&self) -> Vec<StatItem> {
        vec![
            StatItem {
                label: "Bài đã tóm tắt",
                value: self.stats.summaries.to_string(),
                emoji: "📄",
            },
            StatItem {
                label: "Ghi chú",
                value: self.stats.notes.to_string(),
                emoji: "✏️",
            },
            StatItem {
                label: "Ngày liên tiếp",
                value: "—".to_string(),
                emoji: "🔥",
            },
        ]
    }
}
