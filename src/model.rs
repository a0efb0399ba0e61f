//! Model invocation.
//!
//! The backend only consumes the generative model through the narrow
//! [`ModelClient`] contract: one prompt in, one free-text reply out. The
//! production implementation talks to the Gemini `generateContent` endpoint
//! over reqwest; tests substitute a scripted fake.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Failures while talking to the generative-model provider.
///
/// Everything except `Auth` is treated uniformly as "invocation failed" by
/// the request layer; an authentication failure is the one signal worth
/// distinguishing, because it maps to a different HTTP status.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The provider rejected our API key (4xx mentioning the credential).
    #[error("invalid API credential: {0}")]
    Auth(String),

    /// Any other non-success status from the provider.
    #[error("provider returned {status}: {body}")]
    Provider { status: StatusCode, body: String },

    /// Transport-level failure, including the invocation timeout.
    #[error("request to provider failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered 200 but the body carried no candidate text.
    #[error("provider reply had no text content")]
    MalformedReply,
}

/// Narrow contract to the external generative model.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Gemini-backed [`ModelClient`].
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Build a client with a bounded per-invocation timeout. The external
    /// dependency is otherwise unbounded, so the timeout is enforced here
    /// rather than per call site.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: std::time::Duration,
    ) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn invoke(&self, prompt: &str) -> Result<String, ModelError> {
        let url = format!("{}/models/{}:generateContent", GEMINI_BASE_URL, self.model);
        let request_body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        debug!(model = %self.model, "calling Gemini");
        let res = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(%status, "Gemini returned an error");
            if status.is_client_error() && mentions_invalid_credential(&body) {
                return Err(ModelError::Auth(body));
            }
            return Err(ModelError::Provider { status, body });
        }

        let body: serde_json::Value = res.json().await?;
        body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or(ModelError::MalformedReply)
    }
}

/// Observed distinguishing signal for an authentication failure: a 4xx body
/// mentioning an invalid or expired credential.
fn mentions_invalid_credential(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    lower.contains("api_key_invalid")
        || lower.contains("api key not valid")
        || lower.contains("api key expired")
        || lower.contains("invalid api key")
        || lower.contains("credential")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_signal_detected_in_provider_body() {
        assert!(mentions_invalid_credential(
            r#"{"error": {"status": "INVALID_ARGUMENT", "message": "API key not valid. Please pass a valid API key."}}"#
        ));
        assert!(mentions_invalid_credential("reason: API_KEY_INVALID"));
    }

    #[test]
    fn unrelated_provider_errors_are_not_auth() {
        assert!(!mentions_invalid_credential("model is overloaded"));
        assert!(!mentions_invalid_credential("quota exceeded for quota metric"));
    }
}
