// src/config/weather.rs
use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, FixedOffset, Local, Offset, Utc};

use super::{non_blank, trim_base_url};

pub const ENV_OPENWEATHER_APP_KEY: &str = "OPENWEATHER_APP_KEY";
pub const ENV_OPENWEATHER_BASE_URL: &str = "OPENWEATHER_BASE_URL";
pub const ENV_FORECAST_UTC_OFFSET: &str = "FORECAST_UTC_OFFSET";

pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Timezone used to render forecast timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// Host clock zone, resolved per timestamp (DST aware).
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl DisplayZone {
    pub fn utc() -> Self {
        Self::Fixed(Utc.fix())
    }

    /// Parse `local`, `Z`/`UTC`, `+HH:MM`, `-HH:MM`, `+HHMM` or `+HH`.
    pub fn parse(raw: &str) -> Result<Self> {
        let s = raw.trim();
        if s.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }
        if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
            return Ok(Self::utc());
        }

        let (sign, rest) = match s.chars().next() {
            Some('+') => (1, &s[1..]),
            Some('-') => (-1, &s[1..]),
            _ => bail!("offset must start with '+' or '-', got '{s}'"),
        };
        if !rest.is_ascii() {
            bail!("offset contains non-digit characters: '{s}'");
        }
        // HH, HHMM or HH:MM; a colon is only valid right after the hours
        let (hh, mm) = match rest.len() {
            2 => (rest, "00"),
            4 => rest.split_at(2),
            5 if rest.as_bytes()[2] == b':' => (&rest[..2], &rest[3..]),
            _ => bail!("offset must look like +HH:MM, got '{s}'"),
        };
        if !hh.bytes().chain(mm.bytes()).all(|b| b.is_ascii_digit()) {
            bail!("offset contains non-digit characters: '{s}'");
        }
        let (hours, minutes) = (hh.parse::<i32>()?, mm.parse::<i32>()?);
        if hours > 23 || minutes > 59 {
            bail!("offset out of range: '{s}'");
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(Self::Fixed)
            .ok_or_else(|| anyhow!("offset out of range: '{s}'"))
    }

    /// Render epoch seconds as `DD/MM HH:MM`; `None` when the timestamp is out of range.
    pub fn format_timestamp(&self, epoch_secs: i64) -> Option<String> {
        let utc = DateTime::from_timestamp(epoch_secs, 0)?;
        let formatted = match self {
            Self::Local => utc.with_timezone(&Local).format("%d/%m %H:%M").to_string(),
            Self::Fixed(offset) => utc.with_timezone(offset).format("%d/%m %H:%M").to_string(),
        };
        Some(formatted)
    }
}

/// Weather provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
    pub zone: DisplayZone,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_OPENWEATHER_BASE_URL.to_string(),
            zone: DisplayZone::Local,
        }
    }
}

impl WeatherConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = non_blank(lookup, ENV_OPENWEATHER_APP_KEY).unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!("{ENV_OPENWEATHER_APP_KEY} is not set; provider calls will be rejected");
        }

        let base_url = non_blank(lookup, ENV_OPENWEATHER_BASE_URL)
            .map(|u| trim_base_url(&u))
            .unwrap_or_else(|| DEFAULT_OPENWEATHER_BASE_URL.to_string());

        let zone = match non_blank(lookup, ENV_FORECAST_UTC_OFFSET) {
            Some(raw) => DisplayZone::parse(&raw)
                .map_err(|e| anyhow!("invalid {ENV_FORECAST_UTC_OFFSET}: {e}"))?,
            None => DisplayZone::Local,
        };

        Ok(Self {
            api_key,
            base_url,
            zone,
        })
    }
}
