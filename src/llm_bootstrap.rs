// src/llm_bootstrap.rs
use crate::config::LlmConfig;
use crate::narrative::LocalLlmClient;
use tracing::{info, warn};

pub struct LlmRuntime {
    pub client: LocalLlmClient,
}

impl LlmRuntime {
    pub fn new(cfg: LlmConfig) -> anyhow::Result<Self> {
        // Safe diagnostics: base url, timeout, and whether a default model is set
        info!(
            base_url = %cfg.base_url,
            timeout_secs = cfg.timeout_secs,
            has_default_model = cfg.default_model_id.is_some(),
            "LLM cfg loaded"
        );
        Ok(Self {
            client: LocalLlmClient::new(cfg)?,
        })
    }

    /// Send the test message once; logs the outcome and reports whether it succeeded.
    pub async fn quick_probe(&self, model_id: Option<&str>) -> bool {
        let model = self.client.config().resolve_model_id(model_id).to_string();
        match self.client.probe(model_id).await {
            Ok(body) => {
                info!(%model, response = %body, "LLM quick_probe ok");
                true
            }
            Err(e) => {
                warn!(%model, error = %e, "LLM quick_probe failed; /prediction-llm will report failures");
                false
            }
        }
    }
}
