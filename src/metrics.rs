use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metric descriptions (so series show up on /metrics with help text).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "forecast_fetch_total",
            "Requests sent to the weather provider."
        );
        describe_counter!(
            "forecast_fetch_errors_total",
            "Weather provider requests that failed (transport, status or body)."
        );
        describe_histogram!(
            "forecast_fetch_ms",
            "Weather provider round-trip time in milliseconds."
        );
        describe_counter!(
            "narrative_requests_total",
            "Interpretation requests sent to the LLM service."
        );
        describe_counter!(
            "narrative_errors_total",
            "Interpretation requests that failed."
        );
        describe_histogram!("narrative_ms", "LLM round-trip time in milliseconds.");
    });
}

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Only one recorder may exist per process.
    pub fn init() -> Result<Self, BuildError> {
        let handle = PrometheusBuilder::new().install_recorder()?;
        ensure_metrics_described();
        Ok(Self { handle })
    }

    /// Process-wide instance; the recorder is installed on first use.
    pub fn global() -> Option<Self> {
        static GLOBAL: OnceCell<Option<Metrics>> = OnceCell::new();
        GLOBAL
            .get_or_init(|| match Self::init() {
                Ok(m) => Some(m),
                Err(e) => {
                    tracing::warn!(error = %e, "prometheus recorder not installed");
                    None
                }
            })
            .clone()
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics::{counter, histogram};

    #[test]
    fn recorded_series_reach_the_exposition() {
        let m = Metrics::global().expect("recorder installed");
        counter!("narrative_requests_total").increment(1);
        histogram!("narrative_ms").record(12.0);

        let text = m.handle.render();
        assert!(text.contains("# HELP narrative_requests_total"), "got:\n{text}");
        assert!(text.contains("narrative_requests_total 1"), "got:\n{text}");
        assert!(text.contains("narrative_ms"), "got:\n{text}");
    }
}
