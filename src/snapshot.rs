// src/snapshot.rs
//! On-disk forecast snapshot (`{"pronostico": [...]}`, 2-space indented).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::forecast::{ForecastReport, NormalizedForecastEntry};

pub const DEFAULT_SNAPSHOT_PATH: &str = "src/pronostico.json";

pub fn write_snapshot(path: &Path, window: &[NormalizedForecastEntry]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating snapshot directory {}", parent.display()))?;
    }

    let report = ForecastReport::from(window.to_vec());
    let json = serde_json::to_string_pretty(&report).context("serializing forecast snapshot")?;

    // atomic replace via sibling temp file
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("moving snapshot to {}", path.display()))?;

    tracing::info!(path = %path.display(), entries = window.len(), "forecast snapshot written");
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<ForecastReport> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
}
