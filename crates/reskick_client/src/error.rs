//! crates/reskick_client/src/error.rs

use reskick_core::ports::PortError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A non-2xx answer; `message` is the `error` field of the body when present.
    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<ClientError> for PortError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Status { status, message } => match status {
                400 => PortError::InvalidInput(message),
                401 => PortError::Unauthorized,
                402 => PortError::QuotaExhausted(message),
                404 => PortError::NotFound(message),
                409 => PortError::Conflict(message),
                429 => PortError::RateLimited(message),
                _ => PortError::Upstream { status, message },
            },
            other => PortError::Unexpected(other.to_string()),
        }
    }
}
