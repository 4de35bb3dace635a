// src/config/mod.rs
//! Startup configuration. Everything the service reads from the environment is
//! resolved here once and injected into the router state.

pub mod llm;
pub mod weather;

pub use llm::LlmConfig;
pub use weather::{DisplayZone, WeatherConfig};

use anyhow::{Context, Result};

/// Top-level configuration handed to the router and the binaries.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub weather: WeatherConfig,
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Resolve configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary key lookup (tests use a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let weather = WeatherConfig::from_lookup(&lookup).context("weather config")?;
        let llm = LlmConfig::from_lookup(&lookup).context("llm config")?;
        Ok(Self { weather, llm })
    }
}

/// Read a variable and treat blank values as unset.
pub(crate) fn non_blank<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
