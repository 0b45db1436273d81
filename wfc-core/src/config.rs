//! Runtime settings read from the environment (and a `.env` file if present).

use crate::{calendar::DEFAULT_HORIZON, fetch::FetchMode};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

pub const SERVICE_URL_VAR: &str = "WFC_SERVICE_URL";
pub const HORIZON_VAR: &str = "WFC_HORIZON_MONTHS";
pub const FETCH_MODE_VAR: &str = "WFC_FETCH_MODE";
pub const EXPORT_FILENAME_VAR: &str = "WFC_EXPORT_FILENAME";

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";
pub const DEFAULT_EXPORT_FILENAME: &str = "weather_forecast.html";

/// Largest accepted horizon. The service only predicts one year back.
pub const MAX_HORIZON_MONTHS: u32 = 12;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    /// Months on each side of the anchor.
    pub horizon_months: u32,
    pub fetch_mode: FetchMode,
    pub export_filename: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            base_url: DEFAULT_SERVICE_URL.to_string(),
            horizon_months: DEFAULT_HORIZON,
            fetch_mode: FetchMode::default(),
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load `.env` then read the `WFC_*` variables, defaulting what is unset.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServiceConfig::default();
        if let Some(url) = lookup(SERVICE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(horizon) = lookup(HORIZON_VAR) {
            config.horizon_months = horizon
                .trim()
                .parse()
                .with_context(|| format!("{HORIZON_VAR} must be a whole number of months, got '{horizon}'"))?;
            if config.horizon_months > MAX_HORIZON_MONTHS {
                return Err(anyhow!(
                    "{HORIZON_VAR} must be at most {MAX_HORIZON_MONTHS} months, got {}",
                    config.horizon_months
                ));
            }
        }
        if let Some(mode) = lookup(FETCH_MODE_VAR) {
            config.fetch_mode = mode
                .parse()
                .map_err(|e: String| anyhow!("{FETCH_MODE_VAR}: {e}"))?;
        }
        if let Some(name) = lookup(EXPORT_FILENAME_VAR).filter(|v| !v.trim().is_empty()) {
            config.export_filename = name.trim().to_string();
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.horizon_months, 3);
        assert_eq!(config.fetch_mode, FetchMode::Batched);
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            (SERVICE_URL_VAR, "https://weather.example.org/"),
            (HORIZON_VAR, "6"),
            (FETCH_MODE_VAR, "per-date"),
            (EXPORT_FILENAME_VAR, "out.html"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://weather.example.org");
        assert_eq!(config.horizon_months, 6);
        assert_eq!(config.fetch_mode, FetchMode::PerDate);
        assert_eq!(config.export_filename, "out.html");
    }

    #[test]
    fn test_bad_values_are_reported() {
        assert!(ServiceConfig::from_lookup(lookup(&[(HORIZON_VAR, "three")])).is_err());
        let err = ServiceConfig::from_lookup(lookup(&[(HORIZON_VAR, "4000000000")])).unwrap_err();
        assert!(err.to_string().contains("at most 12"));
        let config = ServiceConfig::from_lookup(lookup(&[(HORIZON_VAR, "12")])).unwrap();
        assert_eq!(config.horizon_months, MAX_HORIZON_MONTHS);
        let err = ServiceConfig::from_lookup(lookup(&[(FETCH_MODE_VAR, "parallel")])).unwrap_err();
        assert!(err.to_string().contains(FETCH_MODE_VAR));
    }
}
