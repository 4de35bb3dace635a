// src/forecast/normalize.rs
//! Raw provider entries -> display records.
//!
//! Numbers are kept as `serde_json::Number` so they print with the provider's own
//! precision: `18` stays `18`, `18.0` stays `18.0`.

use serde::Deserialize;
use serde_json::{Number, Value};

use super::types::{CurrentConditions, NormalizedForecastEntry};
use crate::config::DisplayZone;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("forecast entry {index} is malformed: {reason}")]
    MalformedEntry { index: usize, reason: String },
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Number,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    #[serde(default)]
    pop: Option<Number>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentMain {
    temp: Number,
    feels_like: Number,
    humidity: Number,
    pressure: Number,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: Number,
}

#[derive(Debug, Deserialize)]
struct OwCurrent {
    name: String,
    main: OwCurrentMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

/// Normalize every entry, preserving order. One malformed entry fails the whole batch.
pub fn normalize_forecast(
    raw: &[Value],
    zone: &DisplayZone,
) -> Result<Vec<NormalizedForecastEntry>, NormalizeError> {
    raw.iter()
        .enumerate()
        .map(|(index, value)| normalize_entry(index, value, zone))
        .collect()
}

fn normalize_entry(
    index: usize,
    value: &Value,
    zone: &DisplayZone,
) -> Result<NormalizedForecastEntry, NormalizeError> {
    let malformed = |reason: String| NormalizeError::MalformedEntry { index, reason };

    let entry = OwForecastEntry::deserialize(value).map_err(|e| malformed(e.to_string()))?;

    let display_date = zone
        .format_timestamp(entry.dt)
        .ok_or_else(|| malformed(format!("timestamp {} is out of range", entry.dt)))?;

    let description = first_description(&entry.weather)
        .ok_or_else(|| malformed("weather list is empty".into()))?;

    Ok(NormalizedForecastEntry {
        display_date,
        temperature: format!("{}°C", entry.main.temp),
        description: capitalize_first(description),
        precipitation_probability: format_percent(entry.pop.as_ref()),
    })
}

/// Normalize a `/weather` current-conditions object.
pub fn normalize_current(raw: &Value) -> Result<CurrentConditions, NormalizeError> {
    let malformed = |reason: String| NormalizeError::MalformedEntry { index: 0, reason };

    let current = OwCurrent::deserialize(raw).map_err(|e| malformed(e.to_string()))?;
    let description = first_description(&current.weather)
        .ok_or_else(|| malformed("weather list is empty".into()))?;

    Ok(CurrentConditions {
        ciudad: current.name,
        temperatura: format!("{}°C", current.main.temp),
        sensacion_termica: format!("{}°C", current.main.feels_like),
        descripcion: capitalize_first(description),
        humedad: format!("{}%", current.main.humidity),
        viento: format!("{} m/s", current.wind.speed),
        presion: format!("{} hPa", current.main.pressure),
    })
}

fn first_description(weather: &[OwWeather]) -> Option<&str> {
    weather.first().map(|w| w.description.as_str())
}

/// Uppercase the first character only; the rest is left untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `pop` fraction as a percentage. Float input keeps a decimal (`0.42` -> `42.0%`),
/// integer or missing input stays integral (`None` -> `0%`).
pub fn format_percent(pop: Option<&Number>) -> String {
    let Some(n) = pop else {
        return "0%".to_string();
    };

    if let Some(scaled) = n.as_i64().and_then(|i| i.checked_mul(100)) {
        return format!("{scaled}%");
    }
    if let Some(scaled) = n.as_u64().and_then(|u| u.checked_mul(100)) {
        return format!("{scaled}%");
    }

    let scaled = n.as_f64().unwrap_or(0.0) * 100.0;
    match Number::from_f64(scaled) {
        Some(num) => format!("{num}%"),
        None => format!("{scaled}%"),
    }
}
