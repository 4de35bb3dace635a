// tests/local_llm_client.rs
//
// LocalLlmClient against a wiremock server standing in for the local LLM.

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use weather_llm_api::config::llm::FALLBACK_MODEL_ID;
use weather_llm_api::llm_bootstrap::LlmRuntime;
use weather_llm_api::config::LlmConfig;
use weather_llm_api::forecast::{ForecastWindow, NormalizedForecastEntry};
use weather_llm_api::narrative::prompt::{CALLER_USER_ID, CALLER_USER_NAME, PROMPT_CLOSING, PROMPT_PREAMBLE};
use weather_llm_api::narrative::{LocalLlmClient, NarrativeError, NarrativeOutcome, Narrator};

fn window(n: usize) -> ForecastWindow {
    (0..n)
        .map(|i| NormalizedForecastEntry {
            display_date: format!("01/03 {:02}:00", (i * 3) % 24),
            temperature: format!("{}.5°C", 10 + i),
            description: "Lluvia ligera".into(),
            precipitation_probability: "42.0%".into(),
        })
        .collect()
}

fn client(base_url: String, default_model_id: Option<&str>, timeout_secs: u64) -> LocalLlmClient {
    LocalLlmClient::new(LlmConfig {
        base_url,
        default_model_id: default_model_id.map(str::to_string),
        timeout_secs,
        probe_on_start: false,
    })
    .expect("client")
}

async fn last_body(server: &MockServer) -> Value {
    let reqs = server.received_requests().await.expect("recording enabled");
    let last = reqs.last().expect("at least one request");
    serde_json::from_slice(&last.body).expect("json body")
}

#[tokio::test]
async fn success_returns_body_verbatim_with_window() {
    let server = MockServer::start().await;
    let reply = json!({"response": "Lleva paraguas", "meta": {"tokens": 42}});
    Mock::given(method("POST"))
        .and(path("/abc-123/message"))
        .and(body_partial_json(json!({
            "userId": CALLER_USER_ID,
            "userName": CALLER_USER_NAME,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let llm = client(server.uri(), None, 5);
    let outcome = llm.interpret(window(8), Some("abc-123")).await;

    assert_eq!(
        outcome,
        NarrativeOutcome::Success {
            interpretation: reply,
            weather: window(8),
        }
    );

    let body = last_body(&server).await;
    let text = body["text"].as_str().unwrap();
    assert!(text.starts_with(PROMPT_PREAMBLE));
    assert!(text.ends_with(PROMPT_CLOSING));
    assert_eq!(text.matches("Probabilidad de precipitación: 42.0%").count(), 8);
    assert!(text.contains("01/03 21:00: 17.5°C, Lluvia ligera, Probabilidad de precipitación: 42.0%"));
}

#[tokio::test]
async fn non_2xx_is_failure_that_keeps_window() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let outcome = client(server.uri(), Some("m"), 5).interpret(window(8), None).await;

    match outcome {
        NarrativeOutcome::Failure { error, weather } => {
            assert_eq!(
                error,
                NarrativeError::Status {
                    status: 500,
                    body: "model not loaded".into()
                }
            );
            assert!(!error.to_string().is_empty());
            assert_eq!(weather, window(8));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain text answer"))
        .mount(&server)
        .await;

    let outcome = client(server.uri(), None, 5).interpret(window(2), None).await;
    assert!(!outcome.is_success());
    assert_eq!(outcome.weather().len(), 2);
    assert!(matches!(
        outcome,
        NarrativeOutcome::Failure {
            error: NarrativeError::InvalidJson(ref b),
            ..
        } if b == "plain text answer"
    ));
}

#[tokio::test]
async fn slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let outcome = client(server.uri(), None, 1).interpret(window(1), None).await;
    assert!(matches!(
        outcome,
        NarrativeOutcome::Failure {
            error: NarrativeError::Timeout { secs: 1 },
            ..
        }
    ));
}

#[tokio::test]
async fn unreachable_service_is_connect_failure() {
    let outcome = client("http://127.0.0.1:1".into(), None, 2)
        .interpret(window(3), None)
        .await;
    match outcome {
        NarrativeOutcome::Failure { error, weather } => {
            assert!(matches!(error, NarrativeError::Connect(_)), "got {error:?}");
            assert_eq!(weather.len(), 3);
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn model_id_falls_back_to_configured_default_then_constant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/env-model/message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"via": "env"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/{FALLBACK_MODEL_ID}/message")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"via": "fallback"})))
        .expect(1)
        .mount(&server)
        .await;

    let with_env = client(server.uri(), Some("env-model"), 5);
    assert!(with_env.interpret(window(1), None).await.is_success());

    let bare = client(server.uri(), None, 5);
    assert!(bare.interpret(window(1), Some("   ")).await.is_success());
}

#[tokio::test]
async fn probe_sends_fixed_test_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/probe-model/message"))
        .and(body_partial_json(json!({"userId": "test_user"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "hola"})))
        .expect(1)
        .mount(&server)
        .await;

    let v = client(server.uri(), None, 5)
        .probe(Some("probe-model"))
        .await
        .expect("probe ok");
    assert_eq!(v["reply"], "hola");
}

#[tokio::test]
async fn quick_probe_reports_service_health() {
    let healthy = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/{FALLBACK_MODEL_ID}/message")))
        .and(body_partial_json(json!({"userName": "Test Connection"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "hola"})))
        .expect(2)
        .mount(&healthy)
        .await;

    let cfg = client(healthy.uri(), None, 5).config().clone();
    assert!(LlmRuntime::new(cfg.clone()).unwrap().quick_probe(None).await);
    assert!(weather_llm_api::run_llm_quick_probe(&cfg).await.unwrap());

    let failing = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(2)
        .mount(&failing)
        .await;

    let cfg = client(failing.uri(), None, 5).config().clone();
    assert!(!LlmRuntime::new(cfg.clone()).unwrap().quick_probe(None).await);
    assert!(!weather_llm_api::run_llm_quick_probe(&cfg).await.unwrap());
}

#[tokio::test]
async fn probe_rejects_non_json_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let err = client(server.uri(), None, 5).probe(None).await.unwrap_err();
    assert!(matches!(err, NarrativeError::InvalidJson(_)), "got {err:?}");
}
