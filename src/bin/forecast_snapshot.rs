//! Fetches the next ~24 h of forecast for a location, prints it as JSON and
//! persists it as a snapshot file. `--show` prints the saved snapshot instead.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use weather_llm_api::config::AppConfig;
use weather_llm_api::forecast::{
    normalize_current, normalize_forecast, window, ForecastReport, ForecastSource,
    OpenWeatherClient,
};
use weather_llm_api::snapshot::{read_snapshot, write_snapshot, DEFAULT_SNAPSHOT_PATH};

#[derive(Debug, Parser)]
#[command(name = "forecast-snapshot", version, about = "Save the 24 h forecast window to disk")]
struct Cli {
    /// Latitude (defaults to Bogotá)
    #[arg(long, default_value_t = 4.60971, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude (defaults to Bogotá)
    #[arg(long, default_value_t = -74.08175, allow_hyphen_values = true)]
    lon: f64,

    /// Snapshot destination
    #[arg(long, default_value = DEFAULT_SNAPSHOT_PATH)]
    output: PathBuf,

    /// Also print current conditions
    #[arg(long)]
    current: bool,

    /// Print the snapshot already saved at --output and exit, without fetching
    #[arg(long, conflicts_with = "current")]
    show: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let cli = Cli::parse();

    if cli.show {
        let report = read_snapshot(&cli.output)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let cfg = AppConfig::from_env()?;
    let client = OpenWeatherClient::new(&cfg.weather);

    if cli.current {
        let raw = client.fetch_current(cli.lat, cli.lon).await?;
        let current = normalize_current(&raw)?;
        println!("{}", serde_json::to_string_pretty(&current)?);
    }

    let raw = client.fetch_forecast(cli.lat, cli.lon).await?;
    if raw.is_empty() {
        bail!("provider returned no forecast entries for ({}, {})", cli.lat, cli.lon);
    }

    let entries = normalize_forecast(&raw, &cfg.weather.zone)?;
    let win = window(&entries);

    println!("{}", serde_json::to_string_pretty(&ForecastReport::from(win.clone()))?);

    write_snapshot(&cli.output, &win)
        .with_context(|| format!("saving snapshot to {}", cli.output.display()))?;

    Ok(())
}
