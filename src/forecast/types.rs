// src/forecast/types.rs
use serde::{Deserialize, Serialize};

/// Entries are kept opaque until normalization so a malformed entry is reported
/// by the normalizer, not swallowed by the fetch.
pub type RawForecast = Vec<serde_json::Value>;

/// Number of 3-hour entries covering the next ~24 hours.
pub const FORECAST_WINDOW_LEN: usize = 8;

/// Display-ready forecast record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedForecastEntry {
    #[serde(rename = "fecha")]
    pub display_date: String,
    #[serde(rename = "temperatura")]
    pub temperature: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "prob_precipitacion")]
    pub precipitation_probability: String,
}

pub type ForecastWindow = Vec<NormalizedForecastEntry>;

/// Front slice of at most [`FORECAST_WINDOW_LEN`] entries, order preserved.
pub fn window(entries: &[NormalizedForecastEntry]) -> ForecastWindow {
    entries.iter().take(FORECAST_WINDOW_LEN).cloned().collect()
}

/// `{ "pronostico": [...] }` envelope shared by the routes and the snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub pronostico: Vec<NormalizedForecastEntry>,
}

impl From<Vec<NormalizedForecastEntry>> for ForecastReport {
    fn from(pronostico: Vec<NormalizedForecastEntry>) -> Self {
        Self { pronostico }
    }
}

/// Current conditions as produced for the snapshot tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub ciudad: String,
    pub temperatura: String,
    pub sensacion_termica: String,
    pub descripcion: String,
    pub humedad: String,
    pub viento: String,
    pub presion: String,
}
