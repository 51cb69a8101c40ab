pub mod auth_gate;
pub mod content;
pub mod domain;
pub mod notify;
pub mod orchestrator;
pub mod panels;
pub mod ports;
pub mod shell;

#[cfg(test)]
mod test_support;

pub use domain::{
    Account, AccountCredentials, AccountStats, InputMode, NewNote, NewSummary, Note,
    ScrapedPage, Session, Summary, SummaryInput, SummaryStyle,
};
pub use notify::{Notifier, Toast, ToastQueue, ToastVariant};
pub use ports::{
    AuthService, ContentFetchService, DatabaseService, PortError, PortResult, RecordStore,
    SummarizationService,
};
