//! Runtime configuration.
//!
//! Only transport and cache tuning is configurable. Forecast constants
//! (interval width, training gate, slider reserve, horizon range) are fixed.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adapters::YahooHistoryAdapter;
use crate::http_client::ReqwestHttpClient;

/// User agent sent to the market-data provider.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub const ENV_CACHE_TTL_SECS: &str = "TRENDCAST_CACHE_TTL_SECS";
pub const ENV_HTTP_TIMEOUT_MS: &str = "TRENDCAST_HTTP_TIMEOUT_MS";
pub const ENV_USER_AGENT: &str = "TRENDCAST_USER_AGENT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {name} has invalid value '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendcastConfig {
    /// Freshness window of a cached series; zero disables caching.
    pub cache_ttl_secs: u64,
    pub http_timeout_ms: u64,
    pub user_agent: String,
}

impl Default for TrendcastConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 3600,
            http_timeout_ms: 30_000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl TrendcastConfig {
    /// Defaults overlaid with `TRENDCAST_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_CACHE_TTL_SECS) {
            config.cache_ttl_secs = parse_u64(ENV_CACHE_TTL_SECS, &value)?;
        }
        if let Some(value) = lookup(ENV_HTTP_TIMEOUT_MS) {
            config.http_timeout_ms = parse_u64(ENV_HTTP_TIMEOUT_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_USER_AGENT) {
            let value = value.trim();
            if !value.is_empty() {
                config.user_agent = value.to_string();
            }
        }

        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Yahoo adapter over a reqwest transport built from this config.
    pub fn yahoo_adapter(&self) -> YahooHistoryAdapter {
        YahooHistoryAdapter::new(Arc::new(ReqwestHttpClient::new(&self.user_agent)))
            .with_timeout_ms(self.http_timeout_ms)
    }
}

fn parse_u64(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        })
}
