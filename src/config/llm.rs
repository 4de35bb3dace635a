// src/config/llm.rs
use anyhow::{anyhow, Result};
use std::time::Duration;

use super::{non_blank, trim_base_url};

pub const ENV_LLM_BASE_URL: &str = "LLM_BASE_URL";
pub const ENV_LLM_DEFAULT_HASH: &str = "LLM_DEFAULT_HASH";
pub const ENV_LLM_TIMEOUT: &str = "LLM_TIMEOUT";
pub const ENV_LLM_PROBE_ON_START: &str = "LLM_PROBE_ON_START";

pub const DEFAULT_LLM_BASE_URL: &str = "http://localhost:3001";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
/// Model instance addressed when neither the caller nor the environment names one.
pub const FALLBACK_MODEL_ID: &str = "dd1a3913-6f2b-060b-9d69-7efb4bce9f01";

/// Local LLM service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub base_url: String,
    /// Default model instance from the environment, if any.
    pub default_model_id: Option<String>,
    pub timeout_secs: u64,
    /// Send a test message to the service once at startup.
    pub probe_on_start: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            default_model_id: None,
            timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            probe_on_start: false,
        }
    }
}

impl LlmConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = non_blank(lookup, ENV_LLM_BASE_URL)
            .map(|u| trim_base_url(&u))
            .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string());

        let timeout_secs = match non_blank(lookup, ENV_LLM_TIMEOUT) {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    anyhow!("{ENV_LLM_TIMEOUT} must be a positive number of seconds, got '{raw}'")
                })?,
            None => DEFAULT_LLM_TIMEOUT_SECS,
        };

        let probe_on_start = non_blank(lookup, ENV_LLM_PROBE_ON_START).is_some_and(|v| {
            matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
        });

        Ok(Self {
            base_url,
            default_model_id: non_blank(lookup, ENV_LLM_DEFAULT_HASH),
            timeout_secs,
            probe_on_start,
        })
    }

    /// Explicit argument, then the configured default, then the hardcoded fallback.
    pub fn resolve_model_id<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .or(self.default_model_id.as_deref())
            .unwrap_or(FALLBACK_MODEL_ID)
    }

    pub fn message_url(&self, model_id: &str) -> String {
        format!("{}/{}/message", self.base_url, model_id)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
