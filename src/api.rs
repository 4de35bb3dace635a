use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::config::{AppConfig, DisplayZone};
use crate::forecast::{
    normalize_forecast, window, FetchError, ForecastReport, ForecastSource, NormalizeError,
    NormalizedForecastEntry, OpenWeatherClient,
};
use crate::metrics::Metrics;
use crate::narrative::{LocalLlmClient, NarrativeOutcome, Narrator};

pub const NO_FORECAST_MESSAGE: &str = "No se pudo obtener el pronóstico";
pub const LLM_SUCCESS_MESSAGE: &str = "Predicción generada exitosamente";

#[derive(Clone)]
pub struct AppState {
    pub forecast: Arc<dyn ForecastSource>,
    pub narrator: Arc<dyn Narrator>,
    pub zone: DisplayZone,
    pub metrics: Option<Metrics>,
}

impl AppState {
    /// Wire the real provider and LLM clients from resolved configuration.
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let narrator = LocalLlmClient::new(cfg.llm.clone())?;
        tracing::info!(
            llm_base = %cfg.llm.base_url,
            llm_timeout_secs = cfg.llm.timeout_secs,
            weather_base = %cfg.weather.base_url,
            zone = ?cfg.weather.zone,
            "app state configured"
        );
        Ok(Self {
            forecast: Arc::new(OpenWeatherClient::new(&cfg.weather)),
            narrator: Arc::new(narrator),
            zone: cfg.weather.zone,
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

pub fn create_router(state: AppState) -> Router {
    let metrics = state.metrics.clone();

    let router = Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "OK" }))
        .route("/prediction", get(prediction))
        .route("/prediction-llm", get(prediction_llm))
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    match metrics {
        Some(m) => router.merge(m.router()),
        None => router,
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictionQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct LlmPredictionQuery {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub llm_hash: Option<String>,
}

/// Why a forecast could not be produced for a request.
#[derive(Debug)]
enum ForecastFailure {
    NoData,
    Upstream(FetchError),
    Malformed(NormalizeError),
}

impl ForecastFailure {
    fn status(&self) -> StatusCode {
        match self {
            Self::NoData => StatusCode::NOT_FOUND,
            Self::Upstream(_) | Self::Malformed(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::NoData => NO_FORECAST_MESSAGE.to_string(),
            Self::Upstream(e) => format!("{NO_FORECAST_MESSAGE}: {e}"),
            Self::Malformed(e) => format!("Respuesta inválida del proveedor del clima: {e}"),
        }
    }
}

async fn load_forecast(
    state: &AppState,
    lat: f64,
    lon: f64,
) -> Result<Vec<NormalizedForecastEntry>, ForecastFailure> {
    let raw = state
        .forecast
        .fetch_forecast(lat, lon)
        .await
        .map_err(ForecastFailure::Upstream)?;

    if raw.is_empty() {
        tracing::info!(lat, lon, provider = state.forecast.name(), "provider returned no forecast entries");
        return Err(ForecastFailure::NoData);
    }

    normalize_forecast(&raw, &state.zone).map_err(|e| {
        tracing::warn!(error = %e, lat, lon, "malformed forecast payload");
        ForecastFailure::Malformed(e)
    })
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LlmSuccessBody {
    success: bool,
    interpreted_prediction: Value,
    message: &'static str,
    weather_data: ForecastReport,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LlmFailureBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    weather_data: Option<ForecastReport>,
}

async fn index() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "message": "API de pronóstico del clima con interpretación opcional por LLM",
        "endpoints": {
            "/prediction": "GET ?lat=&lon= pronóstico extendido normalizado",
            "/prediction-llm": "GET ?lat=&lon=&llm_hash= pronóstico de 24 h interpretado por el LLM",
            "/health": "GET estado del servicio",
        }
    }))
}

async fn prediction(State(state): State<AppState>, Query(q): Query<PredictionQuery>) -> Response {
    match load_forecast(&state, q.lat, q.lon).await {
        Ok(entries) => {
            tracing::info!(lat = q.lat, lon = q.lon, entries = entries.len(), "prediction served");
            Json(ForecastReport::from(entries)).into_response()
        }
        Err(failure) => (
            failure.status(),
            Json(ErrorBody {
                error: failure.message(),
            }),
        )
            .into_response(),
    }
}

async fn prediction_llm(
    State(state): State<AppState>,
    Query(q): Query<LlmPredictionQuery>,
) -> Response {
    let entries = match load_forecast(&state, q.lat, q.lon).await {
        Ok(entries) => entries,
        Err(failure) => {
            let body = LlmFailureBody {
                success: false,
                error: failure.message(),
                weather_data: None,
            };
            return (failure.status(), Json(body)).into_response();
        }
    };

    let outcome = state
        .narrator
        .interpret(window(&entries), q.llm_hash.as_deref())
        .await;

    match outcome {
        NarrativeOutcome::Success {
            interpretation,
            weather,
        } => Json(LlmSuccessBody {
            success: true,
            interpreted_prediction: interpretation,
            message: LLM_SUCCESS_MESSAGE,
            weather_data: ForecastReport::from(weather),
        })
        .into_response(),
        NarrativeOutcome::Failure { error, weather } => (
            StatusCode::BAD_GATEWAY,
            Json(LlmFailureBody {
                success: false,
                error: error.to_string(),
                weather_data: Some(ForecastReport::from(weather)),
            }),
        )
            .into_response(),
    }
}
