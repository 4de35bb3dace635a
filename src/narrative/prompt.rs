// src/narrative/prompt.rs
use serde::Serialize;

use crate::forecast::NormalizedForecastEntry;

pub const PROMPT_PREAMBLE: &str = "Eres un asistente meteorológico. Analiza el siguiente pronóstico del clima \
para las próximas 24 horas e interpreta el patrón que muestra. Incluye:\n\
1. Recomendaciones de vestimenta y de actividades adecuadas.\n\
2. Advertencias sobre posibles fenómenos peligrosos (lluvias fuertes, tormentas, calor o frío extremo).\n\
3. La tendencia general del clima para los próximos días.\n\n\
Pronóstico (intervalos de 3 horas):";

pub const PROMPT_CLOSING: &str = "Responde en español, de forma clara y concisa, organizando la respuesta \
en tres secciones: Recomendaciones, Advertencias y Tendencia. No inventes datos que no aparezcan en el pronóstico.";

/// Caller identity sent with every interpretation request.
pub const CALLER_USER_ID: &str = "weather_api";
pub const CALLER_USER_NAME: &str = "Weather Prediction API";

/// Body of `POST {base}/{model}/message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeRequest {
    pub text: String,
    pub user_id: String,
    pub user_name: String,
}

impl NarrativeRequest {
    pub fn new(text: String) -> Self {
        Self {
            text,
            user_id: CALLER_USER_ID.to_string(),
            user_name: CALLER_USER_NAME.to_string(),
        }
    }
}

pub fn format_entry_line(entry: &NormalizedForecastEntry) -> String {
    format!(
        "{}: {}, {}, Probabilidad de precipitación: {}",
        entry.display_date, entry.temperature, entry.description, entry.precipitation_probability
    )
}

/// Preamble, one line per entry, closing block.
pub fn build_prompt(window: &[NormalizedForecastEntry]) -> String {
    let mut out =
        String::with_capacity(PROMPT_PREAMBLE.len() + PROMPT_CLOSING.len() + window.len() * 80);
    out.push_str(PROMPT_PREAMBLE);
    out.push('\n');
    for entry in window {
        out.push_str(&format_entry_line(entry));
        out.push('\n');
    }
    out.push('\n');
    out.push_str(PROMPT_CLOSING);
    out
}
