//! crates/reskick_core/src/notify.rs
//!
//! Transient user notifications ("toasts") raised by the view models.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: Option<String>,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn info(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            variant: ToastVariant::Default,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: Some(description.into()),
            variant: ToastVariant::Destructive,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Sink for toasts. The UI layer decides how and for how long they are shown.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// A notifier that buffers toasts until the UI drains them.
#[derive(Debug, Default)]
pub struct ToastQueue {
    pending: Mutex<Vec<Toast>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every toast raised since the last drain, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, toast: Toast) {
        match self.pending.lock() {
            Ok(mut pending) => pending.push(toast),
            Err(poisoned) => poisoned.into_inner().push(toast),
        }
    }
}
