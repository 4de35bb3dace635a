// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod config;
pub mod forecast;
pub mod llm_bootstrap;
pub mod metrics;
pub mod narrative;
pub mod snapshot;

pub use crate::api::{create_router, AppState};
pub use crate::config::AppConfig;

use tracing::info;

/// Build the full router from environment configuration, with `/metrics` when a
/// Prometheus recorder could be installed.
pub async fn app() -> anyhow::Result<axum::Router> {
    let cfg = AppConfig::from_env()?;
    let mut state = AppState::from_config(&cfg)?;
    if let Some(m) = crate::metrics::Metrics::global() {
        state = state.with_metrics(m);
    }
    Ok(create_router(state))
}

/// One-off connectivity check against the LLM service. Never panics; returns
/// whether the service answered the test message with JSON.
///
/// ```ignore
/// match weather_llm_api::run_llm_quick_probe(&cfg.llm).await {
///     Ok(false) => tracing::warn!("LLM service did not answer"),
///     Err(e) => tracing::warn!(error = ?e, "LLM quick probe didn't run"),
///     Ok(true) => {}
/// }
/// ```
pub async fn run_llm_quick_probe(cfg: &config::LlmConfig) -> anyhow::Result<bool> {
    let llm = llm_bootstrap::LlmRuntime::new(cfg.clone())?;
    let ok = llm.quick_probe(None).await;
    info!(ok, "LLM quick probe finished");
    Ok(ok)
}
