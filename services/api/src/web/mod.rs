pub mod auth;
pub mod middleware;
pub mod proxy;
pub mod records;
pub mod rest;
pub mod state;


use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::error::ApiError;

pub use middleware::require_auth;
pub use state::AppState;

/// Builds the CORS layer: any origin unless `ALLOWED_ORIGIN` names one.
fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer, ApiError> {
    let origin = match allowed_origin {
        Some(origin) => AllowOrigin::exact(origin.parse::<HeaderValue>().map_err(|e| {
            ApiError::Internal(format!("Invalid ALLOWED_ORIGIN '{}': {}", origin, e))
        })?),
        None => AllowOrigin::from(Any),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]))
}

/// Assembles every API route on top of the shared state.
pub fn router(app_state: Arc<AppState>) -> Result<Router, ApiError> {
    let cors = cors_layer(app_state.config.allowed_origin.as_deref())?;

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route(
            "/scrape-url",
            post(proxy::scrape_url_handler).options(proxy::options_handler),
        )
        .route(
            "/summarize",
            post(proxy::summarize_handler).options(proxy::options_handler),
        )
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route(
            "/summaries",
            get(records::list_summaries_handler).post(records::create_summary_handler),
        )
        .route("/summaries/{id}", delete(records::delete_summary_handler))
        .route(
            "/notes",
            get(records::list_notes_handler).post(records::create_note_handler),
        )
        .route("/notes/{id}", delete(records::delete_note_handler))
        .route("/stats", get(records::stats_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Ok(Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state))
}
