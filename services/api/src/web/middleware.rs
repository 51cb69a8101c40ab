//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::warn;

use crate::web::{rest::ErrorBody, state::AppState};

/// Reads the session token from `Authorization: Bearer` or, failing that,
/// from the `session` cookie.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| c.trim().strip_prefix("session="))
        .filter(|token| !token.is_empty())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody::new("Unauthorized")),
    )
        .into_response()
}

/// Middleware that validates the session token and extracts the user_id.
///
/// If valid, inserts the user_id into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(req.headers()).map(str::to_string) else {
        return unauthorized();
    };

    let user_id = match state.db.validate_auth_session(&token).await {
        Ok(user_id) => user_id,
        Err(e) => {
            warn!("Rejected auth session: {}", e);
            return unauthorized();
        }
    };

    req.extensions_mut().insert(user_id);
    next.run(req).await
}
