// src/forecast/openweather.rs
use std::time::Instant;

use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::Client;
use serde_json::Value;

use super::{FetchError, ForecastSource, RawForecast};
use crate::config::WeatherConfig;
use crate::metrics::ensure_metrics_described;

const MAX_ERROR_BODY: usize = 200;

/// OpenWeatherMap 2.5 client (`/forecast` and `/weather`).
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(cfg: &WeatherConfig) -> Self {
        Self {
            // No explicit timeout: the provider call relies on the client default.
            http: Client::new(),
            api_key: cfg.api_key.clone(),
            base_url: cfg.base_url.clone(),
        }
    }

    /// Current conditions (`/weather`) as the raw provider object.
    pub async fn fetch_current(&self, lat: f64, lon: f64) -> Result<Value, FetchError> {
        self.get_json("weather", lat, lon).await.inspect_err(|e| {
            tracing::warn!(error = %e, lat, lon, "current weather fetch failed");
        })
    }

    async fn get_json(&self, endpoint: &'static str, lat: f64, lon: f64) -> Result<Value, FetchError> {
        ensure_metrics_described();
        counter!("forecast_fetch_total", "endpoint" => endpoint).increment(1);
        let started = Instant::now();

        let result = self.get_json_inner(endpoint, lat, lon).await;

        histogram!("forecast_fetch_ms", "endpoint" => endpoint)
            .record(started.elapsed().as_secs_f64() * 1000.0);
        if result.is_err() {
            counter!("forecast_fetch_errors_total", "endpoint" => endpoint).increment(1);
        }
        result
    }

    async fn get_json_inner(&self, endpoint: &str, lat: f64, lon: f64) -> Result<Value, FetchError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
                ("lang", "es".to_string()),
            ])
            .send()
            .await
            // the request URL carries the api key
            .map_err(|e| FetchError::Transport(e.without_url()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.without_url()))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ForecastSource for OpenWeatherClient {
    async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<RawForecast, FetchError> {
        let parsed = self.get_json("forecast", lat, lon).await.inspect_err(|e| {
            tracing::warn!(error = %e, lat, lon, "forecast fetch failed");
        })?;

        let entries = extract_list(parsed)?;
        tracing::debug!(count = entries.len(), lat, lon, "forecast fetched");
        Ok(entries)
    }

    fn name(&self) -> &'static str {
        "openweather"
    }
}

/// Pull `list` out of a forecast body; absent or null means no entries.
fn extract_list(mut body: Value) -> Result<RawForecast, FetchError> {
    match body.get_mut("list").map(Value::take) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(FetchError::Decode(format!(
            "expected 'list' to be an array, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() > MAX_ERROR_BODY {
        let head: String = body.chars().take(MAX_ERROR_BODY).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}
