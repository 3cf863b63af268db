//! # Trendcast Core
//!
//! Forecast orchestration for daily price histories.
//!
//! ## Overview
//!
//! A run fetches a ticker's full daily history, selects a trailing training
//! window, fits a trend model, and derives a summary and a CSV export from
//! the same forecast:
//!
//! - **Series cache** memoizes full histories per ticker with a TTL
//! - **Training window selector** applies the offset and the minimum-size gate
//! - **Forecast engine** fits trend plus seasonality with an 80% interval
//! - **Summarizer** reports percent change, trend direction and final bounds
//! - **Exporter** encodes the horizon rows as CSV
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Market-data providers (Yahoo, synthetic) |
//! | [`cache`] | TTL series cache with per-ticker fetch serialization |
//! | [`clock`] | Injectable time source |
//! | [`config`] | Runtime configuration |
//! | [`data_source`] | Provider trait and source errors |
//! | [`domain`] | Ticker, series and forecast types |
//! | [`engine`] | Forecast engine trait and default model |
//! | [`error`] | Validation errors |
//! | [`export`] | CSV export |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`pipeline`] | End-to-end forecast run |
//! | [`summary`] | Statistical summary |
//! | [`window`] | Training window selection |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trendcast_core::{
//!     ForecastPipeline, ForecastRequest, SeriesCache, Ticker, TrendcastConfig,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TrendcastConfig::from_env()?;
//! let cache = SeriesCache::new(Arc::new(config.yahoo_adapter()), config.cache_ttl());
//! let pipeline = ForecastPipeline::with_default_engine(cache);
//!
//! let request = ForecastRequest::new(Ticker::parse("AAPL")?, 0, 90)?;
//! let report = pipeline.run(&request).await?;
//! if let Ok(summary) = &report.summary {
//!     println!("{}: {:.2}%", summary.trend_label, summary.percent_change);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Pipeline failures carry a stable code:
//!
//! ```rust
//! use trendcast_core::PipelineError;
//!
//! fn describe(error: &PipelineError) -> &'static str {
//!     match error {
//!         PipelineError::FetchFailure { .. } => "Ticker not found. Please check the symbol.",
//!         PipelineError::InsufficientData { .. } => "Not enough historical data in the selected range.",
//!         PipelineError::FitFailure(_) => "The model could not be fitted.",
//!     }
//! }
//! ```

pub mod adapters;
pub mod cache;
pub mod clock;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod engine;
pub mod error;
pub mod export;
pub mod http_client;
pub mod pipeline;
pub mod summary;
pub mod window;

// Adapter implementations
pub use adapters::{SyntheticHistoryProvider, YahooHistoryAdapter};

// Caching
pub use cache::{SeriesCache, DEFAULT_SERIES_TTL};
pub use clock::{Clock, ManualClock, SystemClock};

// Configuration
pub use config::{ConfigError, TrendcastConfig};

// Provider trait and types
pub use data_source::{HistoryFuture, HistoryProvider, ProviderId, SourceError, SourceErrorKind};

// Domain models
pub use domain::{
    parse_date, DailyBar, ForecastResult, ForecastRow, PricePoint, PriceSeries, SummaryStats,
    Ticker, TrendLabel,
};

// Forecasting
pub use engine::{FitError, ForecastEngine, TrendSeasonalityEngine, INTERVAL_WIDTH};
pub use export::{export, export_file_name, ExportError, EXPORT_MIME_TYPE};
pub use pipeline::{
    ForecastPipeline, ForecastReport, ForecastRequest, PipelineError, DEFAULT_HORIZON_DAYS,
    MAX_HORIZON_DAYS, MIN_HORIZON_DAYS,
};
pub use summary::{describe, summarize, SummaryError};
pub use window::{TrainingWindow, MIN_TRAINING_POINTS, SLIDER_RESERVE_DAYS};

// Error types
pub use error::ValidationError;

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
