// tests/config_env.rs
use std::env;

use weather_llm_api::config::llm::{DEFAULT_LLM_BASE_URL, FALLBACK_MODEL_ID};
use weather_llm_api::config::{AppConfig, DisplayZone};

const VARS: &[&str] = &[
    "OPENWEATHER_APP_KEY",
    "OPENWEATHER_BASE_URL",
    "FORECAST_UTC_OFFSET",
    "LLM_BASE_URL",
    "LLM_DEFAULT_HASH",
    "LLM_TIMEOUT",
];

fn clear_env() {
    for v in VARS {
        env::remove_var(v);
    }
}

#[serial_test::serial]
#[test]
fn from_env_defaults() {
    clear_env();

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.llm.base_url, DEFAULT_LLM_BASE_URL);
    assert_eq!(cfg.llm.timeout_secs, 30);
    assert_eq!(cfg.llm.resolve_model_id(None), FALLBACK_MODEL_ID);
    assert_eq!(cfg.weather.zone, DisplayZone::Local);
}

#[serial_test::serial]
#[test]
fn from_env_reads_every_setting() {
    clear_env();
    env::set_var("OPENWEATHER_APP_KEY", "owm-key");
    env::set_var("OPENWEATHER_BASE_URL", "http://owm.local/data/2.5/");
    env::set_var("FORECAST_UTC_OFFSET", "-05:00");
    env::set_var("LLM_BASE_URL", "http://llm.local:3001");
    env::set_var("LLM_DEFAULT_HASH", "env-hash");
    env::set_var("LLM_TIMEOUT", "12");

    let cfg = AppConfig::from_env().unwrap();
    clear_env();

    assert_eq!(cfg.weather.api_key, "owm-key");
    assert_eq!(cfg.weather.base_url, "http://owm.local/data/2.5");
    assert_eq!(cfg.weather.zone, DisplayZone::parse("-05:00").unwrap());
    assert_eq!(cfg.llm.timeout_secs, 12);
    assert_eq!(cfg.llm.resolve_model_id(None), "env-hash");
    assert_eq!(cfg.llm.resolve_model_id(Some("call-hash")), "call-hash");
    assert_eq!(
        cfg.llm.message_url(cfg.llm.resolve_model_id(None)),
        "http://llm.local:3001/env-hash/message"
    );
}

#[serial_test::serial]
#[test]
fn from_env_rejects_bad_offset() {
    clear_env();
    env::set_var("FORECAST_UTC_OFFSET", "Bogota");

    let err = AppConfig::from_env().unwrap_err();
    clear_env();

    assert!(format!("{err:#}").contains("FORECAST_UTC_OFFSET"));
}
