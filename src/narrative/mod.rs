// src/narrative/mod.rs
//! Narrative stage: forecast window -> prompt -> local LLM service.

pub mod local_llm;
pub mod prompt;

pub use local_llm::LocalLlmClient;
pub use prompt::{build_prompt, NarrativeRequest};

use async_trait::async_trait;
use serde_json::Value;

use crate::forecast::ForecastWindow;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NarrativeError {
    #[error("LLM service timed out after {secs} seconds")]
    Timeout { secs: u64 },
    #[error("could not connect to LLM service: {0}")]
    Connect(String),
    #[error("LLM service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("LLM service response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("LLM request failed: {0}")]
    Request(String),
}

/// Result of an interpretation request. The weather window travels with both
/// variants so an LLM failure never loses the forecast.
#[derive(Debug, Clone, PartialEq)]
pub enum NarrativeOutcome {
    Success {
        interpretation: Value,
        weather: ForecastWindow,
    },
    Failure {
        error: NarrativeError,
        weather: ForecastWindow,
    },
}

impl NarrativeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn weather(&self) -> &ForecastWindow {
        match self {
            Self::Success { weather, .. } | Self::Failure { weather, .. } => weather,
        }
    }
}

/// Turns a forecast window into an interpretation.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// `window` is expected to be already bounded by the caller.
    async fn interpret(&self, window: ForecastWindow, model_id: Option<&str>) -> NarrativeOutcome;
    fn name(&self) -> &'static str;
}
