//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user signup, login, and logout.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use reskick_core::{domain::MIN_PASSWORD_CHARS, ports::PortError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::{
    middleware::session_token,
    rest::{failure, json_body, port_failure, ApiFailure, ErrorBody},
    state::AppState,
};

const SESSION_DAYS: i64 = 30;
const INVALID_CREDENTIALS: &str = "Invalid email or password";

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    /// Where the confirmation link should send the user back to.
    #[serde(default)]
    pub email_redirect_to: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub email: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub email: String,
    /// Opaque session token, also set as the `session` cookie.
    pub access_token: String,
}

fn session_cookie(token: &str, max_age: i64) -> String {
    format!(
        "session={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        token, max_age
    )
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create a new user account
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Blank email or short password", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiFailure> {
    let req = json_body(payload)?;
    let email = req.email.trim();
    if email.is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "Email is required"));
    }
    if req.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            format!("Password must be at least {} characters", MIN_PASSWORD_CHARS),
        ));
    }

    // 1. Hash the password
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password")
        })?
        .to_string();

    // 2. Create the account. No session is opened until the user signs in.
    let account = state
        .db
        .create_account_with_email(email, &password_hash, req.email_redirect_to.as_deref())
        .await
        .map_err(port_failure)?;
    info!("Created account {}", account.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user_id: account.id,
            email: account.email,
        }),
    ))
}

/// POST /auth/login - Login with existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiFailure> {
    let req = json_body(payload)?;

    // 1. Get the stored credentials
    let creds = state
        .db
        .get_credentials_by_email(req.email.trim())
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => failure(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS),
            other => port_failure(other),
        })?;

    // 2. Verify password
    let parsed_hash = PasswordHash::new(&creds.hashed_password).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        failure(StatusCode::INTERNAL_SERVER_ERROR, "Authentication error")
    })?;
    if Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(failure(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS));
    }

    // 3. Open a session
    let token = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::days(SESSION_DAYS);
    state
        .db
        .create_auth_session(&token, creds.account_id, expires_at)
        .await
        .map_err(port_failure)?;

    let cookie = session_cookie(&token, Duration::days(SESSION_DAYS).num_seconds());
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            user_id: creds.account_id,
            email: creds.email,
            access_token: token,
        }),
    ))
}

/// POST /auth/logout - Logout and invalidate session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session", body = ErrorBody)
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiFailure> {
    let token = session_token(&headers)
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "No session found"))?;

    state
        .db
        .delete_auth_session(token)
        .await
        .map_err(port_failure)?;

    Ok((StatusCode::OK, [(header::SET_COOKIE, session_cookie("", 0))]))
}
