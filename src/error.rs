//! Error types for the AI backend.
//!
//! Every failure between validation and normalization is mapped at the
//! request boundary to a JSON body carrying a human-readable message (in
//! the frontend's language) plus a stable machine-readable `kind`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use crate::model::ModelError;

/// Main error type for the backend.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or empty request field (user-correctable).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The provider rejected our API credential.
    #[error("provider rejected credential: {0}")]
    Auth(String),

    /// Model invocation failed (network, rate limit, provider error).
    #[error("model invocation failed: {0}")]
    Invocation(String),

    /// The model reply contained no JSON-shaped substring.
    #[error("no JSON object found in model reply")]
    Extraction,

    /// The extracted substring was not valid JSON.
    #[error("model reply is not valid JSON: {0}")]
    Parse(String),

    /// Invalid or missing configuration at startup. Fatal before the
    /// listener binds; never surfaced over HTTP in practice.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience Result type using the backend Error.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Auth(detail) => AppError::Auth(detail),
            other => AppError::Invocation(other.to_string()),
        }
    }
}

impl AppError {
    /// Stable error kind exposed to programmatic callers.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Auth(_) => "auth",
            AppError::Invocation(_) => "invocation",
            AppError::Extraction => "extraction",
            AppError::Parse(_) => "parse",
            AppError::Config(_) => "config",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Auth(_) => {
                "Chave de API inválida. Verifique a configuração do serviço de IA.".to_string()
            }
            AppError::Invocation(_) => {
                "Erro ao se comunicar com a API de IA. Verifique sua chave API e logs.".to_string()
            }
            AppError::Extraction => {
                "Não foi possível encontrar um JSON válido na resposta da IA.".to_string()
            }
            AppError::Parse(_) => {
                "Erro ao processar a resposta da IA. Formato inesperado.".to_string()
            }
            AppError::Config(_) => "Serviço de IA não inicializado.".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), detail = %self, "request failed");
        } else {
            tracing::warn!(kind = self.kind(), detail = %self, "request rejected");
        }
        let body = Json(json!({ "error": self.public_message(), "kind": self.kind() }));
        (status, body).into_response()
    }
}
