//! services/api/src/web/rest.rs
//!
//! Shared plumbing for the REST handlers: the error payload, the mapping from
//! port errors to HTTP statuses, and the master definition for the OpenAPI
//! specification.

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use reskick_core::ports::PortError;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{OpenApi, ToSchema};

use crate::web::{auth, proxy, records};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        proxy::scrape_url_handler,
        proxy::summarize_handler,
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        records::list_summaries_handler,
        records::create_summary_handler,
        records::delete_summary_handler,
        records::list_notes_handler,
        records::create_note_handler,
        records::delete_note_handler,
        records::stats_handler,
    ),
    components(
        schemas(
            ErrorBody,
            proxy::ScrapeUrlRequest,
            proxy::ScrapeUrlResponse,
            proxy::SummarizeRequest,
            proxy::SummarizeResponse,
            auth::SignupRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            auth::LoginResponse,
            records::SummaryPayload,
            records::CreateSummaryRequest,
            records::NotePayload,
            records::CreateNoteRequest,
            records::StatsPayload,
        )
    ),
    tags(
        (name = "ResKick API", description = "Article scraping and Vietnamese summarization, plus saved summaries and notes.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Error Payload
//=========================================================================================

/// Every failure is reported as a single human-readable string.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// The error half of every handler's result.
pub type ApiFailure = (StatusCode, Json<ErrorBody>);

pub fn failure(status: StatusCode, message: impl Into<String>) -> ApiFailure {
    (status, Json(ErrorBody::new(message)))
}

/// The HTTP status a port error is reported with.
pub fn status_for(err: &PortError) -> StatusCode {
    match err {
        PortError::NotFound(_) => StatusCode::NOT_FOUND,
        PortError::Unauthorized => StatusCode::UNAUTHORIZED,
        PortError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        PortError::Conflict(_) => StatusCode::CONFLICT,
        PortError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        PortError::QuotaExhausted(_) => StatusCode::PAYMENT_REQUIRED,
        PortError::Upstream { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        PortError::NotConfigured(_) | PortError::Unexpected(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<PortError> for ErrorBody {
    fn from(err: PortError) -> Self {
        Self::new(err.user_message())
    }
}

/// Converts a port error into a handler failure, logging server-side faults.
pub fn port_failure(err: PortError) -> ApiFailure {
    let status = status_for(&err);
    if status.is_server_error() {
        error!("Request failed: {:?}", err);
    }
    (status, Json(err.into()))
}

/// Reports an unreadable JSON body as a 400 with the usual error payload.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiFailure> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| failure(StatusCode::BAD_REQUEST, rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_statuses_pass_through() {
        let err = PortError::Upstream {
            status: 403,
            message: "Forbidden".into(),
        };
        assert_eq!(status_for(&err), StatusCode::FORBIDDEN);
        assert_eq!(
            status_for(&PortError::QuotaExhausted("x".into())),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            status_for(&PortError::NotConfigured("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn openapi_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/scrape-url",
            "/summarize",
            "/auth/signup",
            "/auth/login",
            "/auth/logout",
            "/summaries",
            "/summaries/{id}",
            "/notes",
            "/notes/{id}",
            "/stats",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
