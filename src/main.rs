//! Weather + LLM API — Binary Entrypoint
//! Boots the Axum HTTP server on Shuttle, wiring configuration, shared state and routes.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use weather_llm_api::{api, metrics::Metrics, AppConfig, AppState};

/// Compact tracing logs; `RUST_LOG` overrides the default filter.
/// Shuttle may already have installed a subscriber, in which case this is a no-op.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("weather_llm_api=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = AppConfig::from_env().map_err(shuttle_runtime::Error::Custom)?;

    if cfg.llm.probe_on_start {
        match weather_llm_api::run_llm_quick_probe(&cfg.llm).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!("LLM service did not answer the startup probe"),
            Err(e) => tracing::warn!(error = ?e, "LLM quick probe didn't run"),
        }
    }

    let mut state = AppState::from_config(&cfg).map_err(shuttle_runtime::Error::Custom)?;
    match Metrics::init() {
        Ok(m) => state = state.with_metrics(m),
        Err(e) => tracing::warn!(error = %e, "metrics disabled"),
    }

    let router = api::create_router(state);

    Ok(router.into())
}
