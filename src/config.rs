//! Environment configuration.
//!
//! All knobs come from the environment (optionally via a `.env` file loaded
//! in `main`). A missing `GEMINI_API_KEY` is fatal: the process must not
//! start serving traffic without a credential for the provider.

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;

use crate::error::{AppError, Result};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP listen port (`PORT`).
    pub port: u16,
    /// Credential for the Gemini API (`GEMINI_API_KEY`, mandatory).
    pub gemini_api_key: String,
    /// Model identifier (`GEMINI_MODEL`).
    pub gemini_model: String,
    /// Upper bound on a single model invocation (`GEMINI_TIMEOUT_SECS`).
    pub model_timeout: Duration,
    /// Cross-origin policy (`ALLOWED_ORIGINS`): `*` or a comma-separated
    /// origin allow-list.
    pub allowed_origins: AllowedOrigins,
}

#[derive(Clone, Debug)]
pub enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let gemini_api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            AppError::Config(
                "GEMINI_API_KEY não está definida nas variáveis de ambiente".to_string(),
            )
        })?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| AppError::Config(format!("PORT inválida: {raw}")))?,
            Err(_) => DEFAULT_PORT,
        };

        let gemini_model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let model_timeout = match std::env::var("GEMINI_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw
                    .parse()
                    .map_err(|_| AppError::Config(format!("GEMINI_TIMEOUT_SECS inválido: {raw}")))?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let allowed_origins = match std::env::var("ALLOWED_ORIGINS") {
            Ok(raw) if raw.trim() != "*" => {
                let mut origins = Vec::new();
                for origin in raw.split(',').map(str::trim).filter(|o| !o.is_empty()) {
                    let value = origin.parse::<HeaderValue>().map_err(|_| {
                        AppError::Config(format!("origem inválida em ALLOWED_ORIGINS: {origin}"))
                    })?;
                    origins.push(value);
                }
                AllowedOrigins::List(origins)
            }
            _ => AllowedOrigins::Any,
        };

        Ok(Self {
            port,
            gemini_api_key,
            gemini_model,
            model_timeout,
            allowed_origins,
        })
    }

    pub fn cors_layer(&self) -> CorsLayer {
        match &self.allowed_origins {
            AllowedOrigins::Any => CorsLayer::permissive(),
            AllowedOrigins::List(origins) => CorsLayer::new()
                .allow_origin(origins.clone())
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        }
    }
}
