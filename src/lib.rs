//! # Infinit DAW AI Backend
//!
//! HTTP relay between the Infinit DAW frontend and the Google Gemini API.
//! Each endpoint builds a natural-language prompt from a static parameter
//! table, invokes the model, extracts the JSON object embedded in its
//! free-text reply and clamps every suggested value into its bounds before
//! answering the frontend.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod params;
pub mod prompt;

pub use error::{AppError, Result};

use model::ModelClient;

/// Shared application state passed to all handlers.
///
/// The model client is injected here (rather than held as module-level
/// state) so tests can swap in a scripted fake.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn ModelClient>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/analyze-sentiment", post(handlers::analyze_sentiment))
        .route("/apply-ai-eq", post(handlers::apply_ai_eq))
        .route("/apply-ai-compressor", post(handlers::apply_ai_compressor))
        .with_state(state)
}
