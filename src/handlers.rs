//! HTTP handlers.
//!
//! The EQ and compressor endpoints are the same pipeline parameterized by a
//! subject line and a parameter table; sentiment is the degenerate case
//! with a fixed score/description pair. Every request walks the same chain:
//! validate → build prompt → invoke → extract → normalize → respond.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::params::{extract_json, normalize_settings, parse_sentiment, ParameterSpec};
use crate::params::{COMPRESSOR_PARAMS, EQ_BANDS};
use crate::prompt::{build_sentiment_prompt, build_settings_prompt};
use crate::{AppError, AppState};

const EQ_SUBJECT: &str =
    "Eu tenho um equalizador gráfico de 10 bandas e preciso do ganho para cada banda (as chaves são as frequências em Hz).";
const COMPRESSOR_SUBJECT: &str =
    "Eu tenho um compressor de áudio e preciso de um valor para cada um de seus parâmetros.";

#[derive(Deserialize)]
pub struct SentimentRequest {
    text: Option<String>,
}

#[derive(Serialize)]
pub struct SentimentResponse {
    score: f64,
    magnitude: f64,
    message: String,
}

#[derive(Deserialize)]
pub struct SuggestionRequest {
    prompt: Option<String>,
}

#[derive(Serialize)]
pub struct EqResponse {
    #[serde(rename = "eqSettings")]
    eq_settings: BTreeMap<String, f64>,
}

#[derive(Serialize)]
pub struct CompressorResponse {
    #[serde(rename = "compressorSettings")]
    compressor_settings: BTreeMap<String, f64>,
}

/// Liveness probe.
pub async fn root() -> &'static str {
    "Infinit DAW AI Backend is running with Gemini!"
}

pub async fn analyze_sentiment(
    State(state): State<AppState>,
    Json(req): Json<SentimentRequest>,
) -> Result<Json<SentimentResponse>> {
    let text = require_field(
        &req.text,
        "O texto é obrigatório para análise de sentimento.",
    )?;
    info!("sentiment analysis requested");

    let prompt = build_sentiment_prompt(text);
    let reply = state.model.invoke(&prompt).await?;
    debug!(reply = %reply, "raw model reply");

    let sentiment = parse_sentiment(extract_json(&reply)?)?;
    Ok(Json(SentimentResponse {
        score: sentiment.score,
        magnitude: sentiment.score.abs(),
        message: format!(
            "Sentimento: {}, Pontuação: {}",
            sentiment.description, sentiment.score
        ),
    }))
}

pub async fn apply_ai_eq(
    State(state): State<AppState>,
    Json(req): Json<SuggestionRequest>,
) -> Result<Json<EqResponse>> {
    let description = require_field(&req.prompt, "O prompt é obrigatório.")?;
    info!("EQ suggestion requested");

    let eq_settings = suggest_settings(&state, EQ_SUBJECT, description, EQ_BANDS).await?;
    Ok(Json(EqResponse { eq_settings }))
}

pub async fn apply_ai_compressor(
    State(state): State<AppState>,
    Json(req): Json<SuggestionRequest>,
) -> Result<Json<CompressorResponse>> {
    let description = require_field(&req.prompt, "O prompt é obrigatório.")?;
    info!("compressor suggestion requested");

    let compressor_settings =
        suggest_settings(&state, COMPRESSOR_SUBJECT, description, COMPRESSOR_PARAMS).await?;
    Ok(Json(CompressorResponse {
        compressor_settings,
    }))
}

/// Shared pipeline for the table-driven endpoints.
async fn suggest_settings(
    state: &AppState,
    subject: &str,
    description: &str,
    table: &[ParameterSpec],
) -> Result<BTreeMap<String, f64>> {
    let prompt = build_settings_prompt(subject, description, table);
    let reply = state.model.invoke(&prompt).await?;
    debug!(reply = %reply, "raw model reply");
    normalize_settings(extract_json(&reply)?, table)
}

fn require_field<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}
