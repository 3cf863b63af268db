mod forecast;
mod history;
mod markets;

use std::sync::Arc;

use serde_json::Value;
use trendcast_core::{
    ForecastPipeline, HistoryProvider, SeriesCache, SyntheticHistoryProvider, TrendcastConfig,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Output of one command, rendered as text or JSON.
#[derive(Debug)]
pub struct CommandResult {
    pub data: Value,
    pub text: String,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: Value, text: String) -> Self {
        Self {
            data,
            text,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    match &cli.command {
        Command::History(args) => history::run(args, &build_pipeline(cli)?).await,
        Command::Forecast(args) => forecast::run(args, &build_pipeline(cli)?).await,
        Command::Markets => markets::run(),
    }
}

/// Environment config overlaid with command-line flags.
fn resolve_config(cli: &Cli) -> Result<TrendcastConfig, CliError> {
    let mut config = TrendcastConfig::from_env()?;
    if let Some(timeout_ms) = cli.timeout_ms {
        config.http_timeout_ms = timeout_ms;
    }
    if let Some(ttl) = cli.cache_ttl_secs {
        config.cache_ttl_secs = ttl;
    }
    Ok(config)
}

fn build_pipeline(cli: &Cli) -> Result<ForecastPipeline, CliError> {
    let config = resolve_config(cli)?;
    let provider: Arc<dyn HistoryProvider> = if cli.offline {
        Arc::new(SyntheticHistoryProvider::default())
    } else {
        Arc::new(config.yahoo_adapter())
    };

    tracing::debug!(
        provider = %provider.id(),
        cache_ttl_secs = config.cache_ttl_secs,
        http_timeout_ms = config.http_timeout_ms,
        "pipeline configured"
    );

    let cache = SeriesCache::new(provider, config.cache_ttl());
    Ok(ForecastPipeline::with_default_engine(cache))
}
