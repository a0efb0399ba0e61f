//! Infinit DAW AI Backend - entry point.
//!
//! Loads configuration from the environment, builds the Gemini client and
//! serves the suggestion API. A missing `GEMINI_API_KEY` aborts startup
//! before the listener binds.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use daw_ai_backend::config::Config;
use daw_ai_backend::model::GeminiClient;
use daw_ai_backend::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daw_ai_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("invalid configuration")?;

    let model = GeminiClient::new(
        &config.gemini_api_key,
        &config.gemini_model,
        config.model_timeout,
    )
    .context("failed to build Gemini HTTP client")?;
    info!(model = %config.gemini_model, "Gemini client initialized");

    let state = AppState {
        model: Arc::new(model),
    };
    let app = router(state).layer(config.cors_layer());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;
    info!("AI backend listening on http://{}", addr);
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
