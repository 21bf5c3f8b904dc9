//! Monitoring intake web server.

use std::net::SocketAddr;
use std::sync::Arc;

use database::Database;
use intake_web::{build_router, AppState, Config, WebhookNotifier};
use suggest::{PerplexityClient, Suggester};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting intake web server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    if !config.suggest.is_configured() {
        warn!("PERPLEXITY_API_KEY not set, suggestions will use fallbacks");
    }
    let client = PerplexityClient::new(config.suggest.clone())?;
    let suggester = Suggester::new(Arc::new(client));

    if config.webhook_url.is_none() {
        warn!("MAKECOM_WEBHOOK_URL not set, profile submissions will not be forwarded");
    }
    let notifier = WebhookNotifier::new(config.webhook_url.clone(), config.webhook_timeout)?;

    // Build application state
    let addr = config.addr;
    let state = AppState::new(db, suggester, notifier, config);
    let app = build_router(state);

    // Start server
    info!(addr = %addr, "Intake web server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
