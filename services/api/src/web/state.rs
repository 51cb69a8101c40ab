//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use reskick_core::ports::{ContentFetchService, DatabaseService, SummarizationService};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// The upstream adapters are optional: they only exist when their API key was
/// configured, and the proxy handlers report the missing key per request.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    pub fetcher: Option<Arc<dyn ContentFetchService>>,
    pub summarizer: Option<Arc<dyn SummarizationService>>,
}
