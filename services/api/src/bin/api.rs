//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, FirecrawlAdapter, GatewaySummaryAdapter},
    config::Config,
    error::ApiError,
    web::{self, rest::ApiDoc, state::AppState},
};
use axum::Router;
use reskick_core::ports::{ContentFetchService, SummarizationService};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Upstream Adapters ---
    // A missing key leaves the adapter out; the endpoint then answers 500.
    let fetcher: Option<Arc<dyn ContentFetchService>> = match &config.firecrawl_api_key {
        Some(key) => Some(Arc::new(FirecrawlAdapter::new(
            config.firecrawl_api_url.clone(),
            key.clone(),
        )?)),
        None => {
            warn!("FIRECRAWL_API_KEY is not set; /scrape-url will fail");
            None
        }
    };
    let summarizer: Option<Arc<dyn SummarizationService>> = match &config.ai_gateway_api_key {
        Some(key) => Some(Arc::new(GatewaySummaryAdapter::new(
            config.ai_gateway_url.clone(),
            key.clone(),
            config.summary_model.clone(),
        )?)),
        None => {
            warn!("AI_GATEWAY_API_KEY is not set; /summarize will fail");
            None
        }
    };

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        db: db_adapter,
        config: config.clone(),
        fetcher,
        summarizer,
    });

    // --- 5. Create the Web Router ---
    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(web::router(app_state)?)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
