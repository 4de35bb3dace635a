// src/forecast/mod.rs
//! Forecast fetch + normalization stages.

pub mod normalize;
pub mod openweather;
pub mod types;

pub use normalize::{normalize_current, normalize_forecast, NormalizeError};
pub use openweather::OpenWeatherClient;
pub use types::{
    window, CurrentConditions, ForecastReport, ForecastWindow, NormalizedForecastEntry,
    RawForecast, FORECAST_WINDOW_LEN,
};

use async_trait::async_trait;

/// Failure talking to the weather provider.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("weather provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("weather provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("weather provider returned an unreadable body: {0}")]
    Decode(String),
}

/// Source of raw forecast entries for a coordinate pair.
///
/// `Ok(vec![])` means the provider answered without data; transport and status
/// failures are reported as [`FetchError`].
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<RawForecast, FetchError>;
    fn name(&self) -> &'static str;
}
