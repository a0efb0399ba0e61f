//! Parameter tables, JSON extraction and normalization.
//!
//! This is the core of the service: take the untrusted free-text reply from
//! the model, locate the JSON object inside it, and force every expected
//! field into its bounds. Normalization never fails by construction; a
//! missing or non-numeric field takes the parameter's default instead of
//! failing the whole request.

use std::collections::BTreeMap;

use crate::error::{AppError, Result};

/// One tunable value the frontend can request a suggestion for.
///
/// Defined statically per endpoint at startup, immutable thereafter.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSpec {
    pub key: &'static str,
    pub min: f64,
    pub max: f64,
    /// Explicit fallback used when the model omits the key or returns a
    /// non-numeric value.
    pub default: f64,
    pub unit: &'static str,
}

/// The 10-band graphic EQ, gains bounded to ±18 dB.
pub const EQ_BANDS: &[ParameterSpec] = &[
    ParameterSpec { key: "32", min: -18.0, max: 18.0, default: 0.0, unit: "dB" },
    ParameterSpec { key: "64", min: -18.0, max: 18.0, default: 0.0, unit: "dB" },
    ParameterSpec { key: "125", min: -18.0, max: 18.0, default: 0.0, unit: "dB" },
    ParameterSpec { key: "250", min: -18.0, max: 18.0, default: 0.0, unit: "dB" },
    ParameterSpec { key: "500", min: -18.0, max: 18.0, default: 0.0, unit: "dB" },
    ParameterSpec { key: "1000", min: -18.0, max: 18.0, default: 0.0, unit: "dB" },
    ParameterSpec { key: "2000", min: -18.0, max: 18.0, default: 0.0, unit: "dB" },
    ParameterSpec { key: "4000", min: -18.0, max: 18.0, default: 0.0, unit: "dB" },
    ParameterSpec { key: "8000", min: -18.0, max: 18.0, default: 0.0, unit: "dB" },
    ParameterSpec { key: "16000", min: -18.0, max: 18.0, default: 0.0, unit: "dB" },
];

/// Compressor parameters with neutral defaults.
pub const COMPRESSOR_PARAMS: &[ParameterSpec] = &[
    ParameterSpec { key: "threshold", min: -100.0, max: 0.0, default: -24.0, unit: "dB" },
    ParameterSpec { key: "ratio", min: 1.0, max: 20.0, default: 4.0, unit: ":1" },
    ParameterSpec { key: "knee", min: 0.0, max: 40.0, default: 30.0, unit: "dB" },
    ParameterSpec { key: "attack", min: 0.0, max: 1.0, default: 0.003, unit: "s" },
    ParameterSpec { key: "release", min: 0.01, max: 1.0, default: 0.25, unit: "s" },
];

/// Clamp `value` into `[min, max]` inclusive.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Locate the JSON object embedded in a model reply.
///
/// Best-effort heuristic: the inclusive substring from the first `{` to the
/// last `}`. It assumes the model emits at most one JSON object and no
/// stray braces in surrounding prose; when that assumption breaks the
/// candidate simply fails to parse downstream. It never panics.
pub fn extract_json(reply: &str) -> Result<&str> {
    match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&reply[start..=end]),
        _ => Err(AppError::Extraction),
    }
}

/// Parse a JSON candidate and normalize it against a parameter table.
///
/// The output contains exactly the keys of `table`: present numeric values
/// are clamped into their bounds, anything missing or non-numeric takes the
/// spec default, and unknown keys from the model are discarded.
pub fn normalize_settings(candidate: &str, table: &[ParameterSpec]) -> Result<BTreeMap<String, f64>> {
    let parsed: serde_json::Value =
        serde_json::from_str(candidate).map_err(|e| AppError::Parse(e.to_string()))?;
    let object = parsed.as_object();

    let mut settings = BTreeMap::new();
    for spec in table {
        let value = match object.and_then(|o| o.get(spec.key)).and_then(|v| v.as_f64()) {
            Some(v) => clamp(v, spec.min, spec.max),
            None => spec.default,
        };
        settings.insert(spec.key.to_string(), value);
    }
    Ok(settings)
}

/// Parsed sentiment reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentiment {
    pub score: f64,
    pub description: String,
}

/// Degenerate normalization for the sentiment endpoint: a single
/// `score`/`description` pair instead of a per-band table. Missing or
/// non-numeric score falls back to 0.0 and is clamped to [-1, 1].
pub fn parse_sentiment(candidate: &str) -> Result<Sentiment> {
    let parsed: serde_json::Value =
        serde_json::from_str(candidate).map_err(|e| AppError::Parse(e.to_string()))?;

    let score = clamp(parsed["score"].as_f64().unwrap_or(0.0), -1.0, 1.0);
    let description = parsed["description"].as_str().unwrap_or_default().to_string();

    Ok(Sentiment { score, description })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_is_identity_inside_bounds() {
        assert_eq!(clamp(3.5, -18.0, 18.0), 3.5);
        assert_eq!(clamp(-18.0, -18.0, 18.0), -18.0);
        assert_eq!(clamp(18.0, -18.0, 18.0), 18.0);
    }

    #[test]
    fn clamp_saturates_at_bounds() {
        assert_eq!(clamp(50.0, -18.0, 18.0), 18.0);
        assert_eq!(clamp(-50.0, -18.0, 18.0), -18.0);
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
    }

    #[test]
    fn extract_is_identity_on_minimal_json() {
        assert_eq!(extract_json(r#"{"a":1}"#).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn extract_finds_object_inside_prose() {
        let reply = "Here you go:\n```json\n{\"32\": 5.0}\n```\nEnjoy!";
        assert_eq!(extract_json(reply).unwrap(), "{\"32\": 5.0}");
    }

    #[test]
    fn extract_rejects_reply_without_braces() {
        assert!(matches!(
            extract_json("sorry, I cannot help with that"),
            Err(AppError::Extraction)
        ));
    }

    #[test]
    fn extract_rejects_reversed_braces() {
        assert!(matches!(extract_json("} oops {"), Err(AppError::Extraction)));
        assert!(matches!(extract_json("{"), Err(AppError::Extraction)));
    }

    #[test]
    fn normalize_empty_object_yields_all_defaults() {
        let settings = normalize_settings("{}", EQ_BANDS).unwrap();
        assert_eq!(settings.len(), EQ_BANDS.len());
        for spec in EQ_BANDS {
            assert_eq!(settings[spec.key], spec.default);
        }

        let settings = normalize_settings("{}", COMPRESSOR_PARAMS).unwrap();
        assert_eq!(settings["threshold"], -24.0);
        assert_eq!(settings["ratio"], 4.0);
        assert_eq!(settings["attack"], 0.003);
    }

    #[test]
    fn normalize_output_keys_match_table_exactly() {
        let candidate = r#"{"32": 1.0, "wet": 0.5, "vocals": "louder"}"#;
        let settings = normalize_settings(candidate, EQ_BANDS).unwrap();
        let mut expected: Vec<&str> = EQ_BANDS.iter().map(|s| s.key).collect();
        expected.sort();
        let got: Vec<&str> = settings.keys().map(String::as_str).collect();
        assert_eq!(got, expected);
        assert!(!settings.contains_key("wet"));
    }

    #[test]
    fn normalize_clamps_out_of_range_values() {
        let settings = normalize_settings(r#"{"32": 50, "64": -99.5}"#, EQ_BANDS).unwrap();
        assert_eq!(settings["32"], 18.0);
        assert_eq!(settings["64"], -18.0);
    }

    #[test]
    fn normalize_non_numeric_value_falls_back_to_default() {
        let settings = normalize_settings(r#"{"ratio": "4:1"}"#, COMPRESSOR_PARAMS).unwrap();
        assert_eq!(settings["ratio"], 4.0);
    }

    #[test]
    fn normalize_rejects_invalid_json() {
        assert!(matches!(
            normalize_settings("{not valid json}", EQ_BANDS),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn sentiment_parses_score_and_description() {
        let s = parse_sentiment(r#"{"score": 0.8, "description": "positive"}"#).unwrap();
        assert_eq!(s.score, 0.8);
        assert_eq!(s.description, "positive");
    }

    #[test]
    fn sentiment_clamps_score_into_unit_range() {
        let s = parse_sentiment(r#"{"score": 3.0, "description": "euphoric"}"#).unwrap();
        assert_eq!(s.score, 1.0);
    }

    #[test]
    fn sentiment_missing_fields_fall_back() {
        let s = parse_sentiment("{}").unwrap();
        assert_eq!(s.score, 0.0);
        assert_eq!(s.description, "");
    }
}
