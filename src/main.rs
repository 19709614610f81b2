mod config;
mod errors;
mod handlers;
mod models;
mod report;
mod session;
mod sheets_client;
mod submission;
mod template;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::session::SessionStore;
use crate::sheets_client::SheetsClient;
use crate::template::TemplateStore;

/// Main entry point for the application.
///
/// Initializes tracing, configuration, the print template (an explicit step
/// with a reported readiness state), the spreadsheet client and the session
/// cache, then serves the calculator API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_sma_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Load the print template. A missing template degrades the report
    // endpoint to 503; it does not prevent startup.
    let template = TemplateStore::load(&config.template_path).await;

    // Initialize the spreadsheet client with an explicit request timeout
    let sheets_client = match SheetsClient::new(
        config.sheets_api_url.clone(),
        Duration::from_secs(config.sheets_timeout_secs),
    ) {
        Ok(client) => {
            tracing::info!("✓ Sheets client initialized: {}", config.sheets_api_url);
            client
        }
        Err(e) => anyhow::bail!("Failed to initialize sheets client: {}", e),
    };

    // Per-session last-calculation cache
    let sessions = SessionStore::new(Duration::from_secs(config.session_ttl_secs));
    tracing::info!("Session cache initialized");

    // Build application state
    let app_state = Arc::new(handlers::AppState {
        sheets_client,
        sessions,
        template,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        .route("/api/v1/options", post(handlers::compute_options))
        .route("/api/v1/report", post(handlers::render_report))
        .route("/api/v1/calculations", post(handlers::submit_calculation))
        .route(
            "/api/v1/calculations/counter-offer",
            post(handlers::submit_counter_offer),
        )
        .layer(
            ServiceBuilder::new()
                // Request size limit: calculator payloads are small
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        // The calculator page is served from another origin
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
