// src/narrative/local_llm.rs
use std::time::Instant;

use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::Client;
use serde_json::Value;

use super::prompt::{build_prompt, NarrativeRequest};
use super::{NarrativeError, NarrativeOutcome, Narrator};
use crate::config::LlmConfig;
use crate::forecast::ForecastWindow;
use crate::metrics::ensure_metrics_described;

const MAX_ERROR_BODY: usize = 500;

pub const PROBE_TEXT: &str = "Hola, ¿puedes responder a este mensaje de prueba?";
pub const PROBE_USER_ID: &str = "test_user";
pub const PROBE_USER_NAME: &str = "Test Connection";

/// Client for a locally hosted LLM exposing `POST /{model}/message`.
#[derive(Debug, Clone)]
pub struct LocalLlmClient {
    http: Client,
    cfg: LlmConfig,
}

impl LocalLlmClient {
    pub fn new(cfg: LlmConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(concat!("weather-llm-api/", env!("CARGO_PKG_VERSION")))
            .timeout(cfg.timeout())
            .build()?;
        Ok(Self { http, cfg })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.cfg
    }

    /// Send a fixed test message to check the service answers with JSON.
    pub async fn probe(&self, model_id: Option<&str>) -> Result<Value, NarrativeError> {
        let model = self.cfg.resolve_model_id(model_id);
        let req = NarrativeRequest {
            text: PROBE_TEXT.to_string(),
            user_id: PROBE_USER_ID.to_string(),
            user_name: PROBE_USER_NAME.to_string(),
        };
        self.send(model, &req).await
    }

    async fn send(&self, model_id: &str, req: &NarrativeRequest) -> Result<Value, NarrativeError> {
        let url = self.cfg.message_url(model_id);
        tracing::debug!(%url, prompt_len = req.text.len(), "posting to LLM service");

        let res = self
            .http
            .post(&url)
            .json(req)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(NarrativeError::Status {
                status: status.as_u16(),
                body: truncate_chars(&body, MAX_ERROR_BODY),
            });
        }

        serde_json::from_str(&body)
            .map_err(|_| NarrativeError::InvalidJson(truncate_chars(&body, MAX_ERROR_BODY)))
    }

    fn classify(&self, e: reqwest::Error) -> NarrativeError {
        if e.is_timeout() {
            NarrativeError::Timeout {
                secs: self.cfg.timeout_secs,
            }
        } else if e.is_connect() {
            NarrativeError::Connect(e.to_string())
        } else {
            NarrativeError::Request(e.to_string())
        }
    }
}

#[async_trait]
impl Narrator for LocalLlmClient {
    async fn interpret(&self, window: ForecastWindow, model_id: Option<&str>) -> NarrativeOutcome {
        ensure_metrics_described();
        counter!("narrative_requests_total").increment(1);

        let model = self.cfg.resolve_model_id(model_id);
        let req = NarrativeRequest::new(build_prompt(&window));

        let started = Instant::now();
        let result = self.send(model, &req).await;
        histogram!("narrative_ms").record(started.elapsed().as_secs_f64() * 1000.0);

        match result {
            Ok(interpretation) => {
                tracing::info!(model, entries = window.len(), "LLM interpretation received");
                NarrativeOutcome::Success {
                    interpretation,
                    weather: window,
                }
            }
            Err(error) => {
                counter!("narrative_errors_total").increment(1);
                tracing::warn!(model, error = %error, "LLM interpretation failed");
                NarrativeOutcome::Failure {
                    error,
                    weather: window,
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "local-llm"
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_is_char_safe() {
        let s = "ñ".repeat(600);
        assert_eq!(truncate_chars(&s, MAX_ERROR_BODY).chars().count(), MAX_ERROR_BODY);
    }

    #[test]
    fn client_builds_from_default_config() {
        let client = LocalLlmClient::new(LlmConfig::default()).unwrap();
        assert_eq!(client.config().timeout_secs, 30);
        assert_eq!(client.name(), "local-llm");
    }
}
