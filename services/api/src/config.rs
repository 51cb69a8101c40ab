//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

pub const DEFAULT_FIRECRAWL_API_URL: &str = "https://api.firecrawl.dev/v1";
pub const DEFAULT_AI_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1";
pub const DEFAULT_SUMMARY_MODEL: &str = "google/gemini-3-flash-preview";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub firecrawl_api_key: Option<String>,
    pub firecrawl_api_url: String,
    pub ai_gateway_api_key: Option<String>,
    pub ai_gateway_url: String,
    pub summary_model: String,
    /// Reject unknown summary styles instead of falling back to "concise".
    pub strict_style: bool,
    /// Single allowed CORS origin; any origin when unset.
    pub allowed_origin: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Upstream Credentials (as optional) ---
        // A missing key is reported per request, not at startup.
        let firecrawl_api_key = non_empty_var("FIRECRAWL_API_KEY");
        let ai_gateway_api_key = non_empty_var("AI_GATEWAY_API_KEY");

        // --- Load Upstream Endpoints ---
        let firecrawl_api_url = std::env::var("FIRECRAWL_API_URL")
            .unwrap_or_else(|_| DEFAULT_FIRECRAWL_API_URL.to_string());
        let ai_gateway_url = std::env::var("AI_GATEWAY_URL")
            .unwrap_or_else(|_| DEFAULT_AI_GATEWAY_URL.to_string());
        let summary_model = std::env::var("SUMMARY_MODEL")
            .unwrap_or_else(|_| DEFAULT_SUMMARY_MODEL.to_string());

        let strict_style = match std::env::var("STRICT_STYLE") {
            Ok(value) => parse_bool("STRICT_STYLE", &value)?,
            Err(_) => false,
        };
        let allowed_origin = non_empty_var("ALLOWED_ORIGIN");

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            firecrawl_api_key,
            firecrawl_api_url,
            ai_gateway_api_key,
            ai_gateway_url,
            summary_model,
            strict_style,
            allowed_origin,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidValue(
            name.to_string(),
            format!("'{}' is not a boolean", other),
        )),
    }
}
