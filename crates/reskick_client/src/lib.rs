//! crates/reskick_client/src/lib.rs
//!
//! HTTP adapters that implement the core ports against a running `api`
//! service, so the view models in `reskick_core` can be driven by a real
//! backend.

pub mod client;
pub mod config;
pub mod error;
mod wire;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::ClientError;
