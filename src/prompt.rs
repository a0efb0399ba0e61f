//! Prompt builders.
//!
//! Both builders are deterministic: the same description and table always
//! produce the same prompt. The settings prompt embeds the parameter list
//! with bounds and units, a JSON-only instruction and one worked example
//! built from the table defaults, mirroring the prompt the original EQ
//! assistant used.

use crate::params::ParameterSpec;

/// Build the instruction prompt for a settings endpoint (EQ, compressor).
pub fn build_settings_prompt(subject: &str, description: &str, table: &[ParameterSpec]) -> String {
    let mut prompt = String::new();
    prompt.push_str(subject);
    prompt.push_str("\nOs parâmetros disponíveis e seus limites são:\n");
    for spec in table {
        prompt.push_str(&format!(
            "- \"{}\": {} a {} {}\n",
            spec.key, spec.min, spec.max, spec.unit
        ));
    }
    prompt.push_str(&format!(
        "\nCom base na seguinte descrição de áudio: \"{description}\", forneça um valor para cada parâmetro.\n"
    ));
    prompt.push_str(
        "Responda apenas com um objeto JSON cujas chaves são exatamente os identificadores \
         listados e cujos valores são numéricos dentro dos limites.\nExemplo:\n{\n",
    );
    for (i, spec) in table.iter().enumerate() {
        let separator = if i + 1 == table.len() { "" } else { "," };
        prompt.push_str(&format!("    \"{}\": {}{}\n", spec.key, spec.default, separator));
    }
    prompt.push('}');
    prompt
}

/// Build the sentiment-analysis prompt (score in -1.0..1.0 plus a short
/// description, JSON-only answer).
pub fn build_sentiment_prompt(text: &str) -> String {
    format!(
        "Analise o sentimento do seguinte texto e me dê uma pontuação de -1.0 (negativo) a \
         1.0 (positivo), e uma breve descrição do sentimento. Responda apenas com um JSON no \
         formato: {{\"score\": <valor_numerico>, \"description\": \"<texto_descritivo>\"}}.\n\n\
         Texto: \"{text}\""
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{COMPRESSOR_PARAMS, EQ_BANDS};

    #[test]
    fn settings_prompt_is_deterministic() {
        let a = build_settings_prompt("Equalizador.", "mais graves", EQ_BANDS);
        let b = build_settings_prompt("Equalizador.", "mais graves", EQ_BANDS);
        assert_eq!(a, b);
    }

    #[test]
    fn settings_prompt_lists_every_parameter_with_bounds() {
        let prompt = build_settings_prompt("Compressor.", "voz suave", COMPRESSOR_PARAMS);
        for spec in COMPRESSOR_PARAMS {
            assert!(prompt.contains(&format!("\"{}\"", spec.key)));
        }
        assert!(prompt.contains("-100 a 0 dB"));
        assert!(prompt.contains("1 a 20 :1"));
        assert!(prompt.contains("voz suave"));
    }

    #[test]
    fn settings_prompt_carries_a_worked_example() {
        let prompt = build_settings_prompt("Equalizador.", "brilho", EQ_BANDS);
        assert!(prompt.contains("Exemplo:"));
        assert!(prompt.contains("\"16000\": 0"));
        assert!(prompt.trim_end().ends_with('}'));
    }

    #[test]
    fn sentiment_prompt_embeds_text_and_contract() {
        let prompt = build_sentiment_prompt("I love this.");
        assert!(prompt.contains("Texto: \"I love this.\""));
        assert!(prompt.contains("\"score\""));
        assert!(prompt.contains("-1.0"));
    }
}
