//! crates/reskick_client/src/config.rs

use std::time::Duration;

use url::Url;

use crate::error::ClientError;

/// Default request timeout; a summarization round trip can take a while.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Where the `api` service lives and how long to wait for it.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl(e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl(format!(
                "unsupported scheme '{}'",
                base_url.scheme()
            )));
        }
        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The absolute URL of an API route such as `/summaries`.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}
