//! Runtime settings read from the environment
//!
//! Every value has a default from [`crate::constants`], so an empty
//! environment yields a working configuration against the public API.

use crate::{
    constants::{COINGECKO_API_URL, DEFAULT_DATA_DIR, REQUEST_TIMEOUT_SECS},
    error::{ConfigError, ProviderError},
    persistence::JsonFilePersistence,
    providers::CoinGeckoProvider,
    store::ViewedCoinsStore,
    types::Currency,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Base URL of the CoinGecko API
pub const ENV_API_URL: &str = "COINGECKO_API_URL";
/// Directory the viewed-coins store is persisted in
pub const ENV_DATA_DIR: &str = "COIN_MARKET_DATA_DIR";
/// Currency selected at startup
pub const ENV_CURRENCY: &str = "COIN_MARKET_CURRENCY";
/// HTTP request timeout in seconds
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "COIN_MARKET_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub data_dir: PathBuf,
    pub currency: Currency,
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: COINGECKO_API_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            currency: Currency::default(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Loads settings from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through an arbitrary variable lookup
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let currency = match get(ENV_CURRENCY) {
            Some(raw) => raw
                .parse::<Currency>()
                .map_err(|e| ConfigError::invalid(ENV_CURRENCY, e.to_string()))?,
            None => defaults.currency,
        };

        let request_timeout = match get(ENV_REQUEST_TIMEOUT_SECS) {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .map_err(|e| ConfigError::invalid(ENV_REQUEST_TIMEOUT_SECS, e.to_string()))?;
                if secs == 0 {
                    return Err(ConfigError::invalid(
                        ENV_REQUEST_TIMEOUT_SECS,
                        "must be greater than zero",
                    ));
                }
                Duration::from_secs(secs)
            }
            None => defaults.request_timeout,
        };

        Ok(Self {
            api_url: get(ENV_API_URL).unwrap_or(defaults.api_url),
            data_dir: get(ENV_DATA_DIR).map(PathBuf::from).unwrap_or(defaults.data_dir),
            currency,
            request_timeout,
        })
    }

    /// Builds a CoinGecko provider for these settings
    pub fn coingecko_provider(&self) -> Result<CoinGeckoProvider, ProviderError> {
        CoinGeckoProvider::with_base_url(&self.api_url, self.request_timeout)
    }

    /// Opens the viewed-coins store persisted under `data_dir`
    pub fn open_store(&self) -> ViewedCoinsStore {
        ViewedCoinsStore::open(Arc::new(JsonFilePersistence::new(&self.data_dir)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(settings(&[]).unwrap(), Settings::default());
    }

    #[test]
    fn test_overrides() {
        let settings = settings(&[
            (ENV_API_URL, "http://localhost:9000"),
            (ENV_DATA_DIR, "/tmp/coins"),
            (ENV_CURRENCY, "GBP"),
            (ENV_REQUEST_TIMEOUT_SECS, "3"),
        ])
        .unwrap();

        assert_eq!(settings.api_url, "http://localhost:9000");
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/coins"));
        assert_eq!(settings.currency, Currency::Gbp);
        assert_eq!(settings.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let settings = settings(&[(ENV_CURRENCY, "  ")]).unwrap();
        assert_eq!(settings.currency, Currency::Usd);
    }

    #[test]
    fn test_invalid_values() {
        assert!(settings(&[(ENV_CURRENCY, "doge")]).is_err());
        assert!(settings(&[(ENV_REQUEST_TIMEOUT_SECS, "soon")]).is_err());
        assert!(settings(&[(ENV_REQUEST_TIMEOUT_SECS, "0")]).is_err());
    }
}
