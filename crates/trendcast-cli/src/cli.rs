//! CLI argument definitions for trendcast.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `history` | Show the available history and selectable training offsets |
//! | `forecast` | Fit a trend model and summarize the projected move |
//! | `markets` | List exchange suffixes for international tickers |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--offline` | `false` | Use the synthetic provider |
//! | `--timeout-ms` | config | HTTP request timeout in ms |
//! | `--cache-ttl-secs` | config | Series cache freshness window |
//! | `--log-level` | `warn` | Log filter when `RUST_LOG` is unset |
//!
//! # Examples
//!
//! ```bash
//! # Inspect what history is available
//! trendcast history AAPL
//!
//! # 180-day forecast trained from two years after the first close
//! trendcast forecast AAPL --offset 730 --horizon 180
//!
//! # Save the horizon rows to BP.L_forecast.csv
//! trendcast forecast BP.L --export
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use trendcast_core::{DEFAULT_HORIZON_DAYS, MAX_HORIZON_DAYS, MIN_HORIZON_DAYS};

/// Trendcast - trend forecasts for daily price histories
#[derive(Debug, Parser)]
#[command(
    name = "trendcast",
    author,
    version,
    about = "Trend forecasts with 80% confidence bands for daily price histories",
    long_about = "Trendcast fetches a ticker's full daily history, trains a trend and \
seasonality model on a trailing window, and reports the projected change with an \
80% confidence interval.\n\
\n\
This tool is for educational and informational purposes only. It is not financial advice."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Use deterministic synthetic history instead of the network.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// HTTP request timeout in milliseconds (overrides TRENDCAST_HTTP_TIMEOUT_MS).
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Series cache freshness in seconds (overrides TRENDCAST_CACHE_TTL_SECS).
    #[arg(long, global = true)]
    pub cache_ttl_secs: Option<u64>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Table,
    /// Single JSON object.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the available daily history for a ticker.
    History(HistoryArgs),
    /// Forecast the trend for a ticker.
    Forecast(ForecastArgs),
    /// List supported exchange suffixes.
    Markets,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Ticker symbol, e.g. AAPL, BP.L, 7203.T, BTC-USD.
    pub ticker: String,
}

#[derive(Debug, Args)]
pub struct ForecastArgs {
    /// Ticker symbol, e.g. AAPL, BP.L, 7203.T, BTC-USD.
    pub ticker: String,

    /// Days after the first available close where training starts.
    #[arg(long, default_value_t = 0)]
    pub offset: u32,

    /// Days to forecast.
    #[arg(
        long,
        default_value_t = DEFAULT_HORIZON_DAYS,
        value_parser = clap::value_parser!(u32).range(i64::from(MIN_HORIZON_DAYS)..=i64::from(MAX_HORIZON_DAYS))
    )]
    pub horizon: u32,

    /// Write the forecast horizon as CSV; defaults to {TICKER}_forecast.csv.
    #[arg(long, num_args = 0..=1)]
    pub export: Option<Option<PathBuf>>,

    /// Forecast rows to print in table output.
    #[arg(long, default_value_t = 10)]
    pub tail: usize,
}
