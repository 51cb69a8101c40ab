//! services/api/src/lib.rs
//!
//! The `api` service: the scrape and summarize proxies plus the account and
//! record store endpoints, wired together by the `api` binary.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
