//! End-to-end forecast run.
//!
//! ```text
//! SeriesCache ─▶ window::select ─▶ ForecastEngine ─┬─▶ summarize
//!                                                  └─▶ export
//! ```
//!
//! Every failure is terminal for the run and nothing is retried. A summary
//! failure does not fail the run: the report keeps the forecast so it can
//! still be exported.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::cache::SeriesCache;
use crate::engine::{FitError, ForecastEngine, TrendSeasonalityEngine};
use crate::export::{export, ExportError};
use crate::summary::{summarize, SummaryError};
use crate::window::{self, TrainingWindow, MIN_TRAINING_POINTS};
use crate::{ForecastResult, PriceSeries, SummaryStats, Ticker, ValidationError};

pub const MIN_HORIZON_DAYS: u32 = 30;
pub const MAX_HORIZON_DAYS: u32 = 365;
pub const DEFAULT_HORIZON_DAYS: u32 = 90;

/// Parameters of one forecast run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    pub ticker: Ticker,
    pub offset_days: u32,
    pub horizon_days: u32,
}

impl ForecastRequest {
    /// Build a request, validating the horizon range.
    pub fn new(
        ticker: Ticker,
        offset_days: u32,
        horizon_days: u32,
    ) -> Result<Self, ValidationError> {
        if !(MIN_HORIZON_DAYS..=MAX_HORIZON_DAYS).contains(&horizon_days) {
            return Err(ValidationError::HorizonOutOfRange {
                value: horizon_days,
                min: MIN_HORIZON_DAYS,
                max: MAX_HORIZON_DAYS,
            });
        }

        Ok(Self {
            ticker,
            offset_days,
            horizon_days,
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("no price history available for '{ticker}'")]
    FetchFailure { ticker: Ticker },
    #[error("not enough historical data in the selected range: {points} points, need at least {required}")]
    InsufficientData { points: usize, required: usize },
    #[error("forecast model failed: {0}")]
    FitFailure(#[from] FitError),
}

impl PipelineError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::FetchFailure { .. } => "pipeline.fetch_failure",
            Self::InsufficientData { .. } => "pipeline.insufficient_data",
            Self::FitFailure(_) => "pipeline.fit_failure",
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastReport {
    pub ticker: Ticker,
    pub window: TrainingWindow,
    pub training_points: usize,
    /// Last observed close in the training window.
    pub latest_price: f64,
    pub horizon_days: u32,
    pub forecast: ForecastResult,
    pub summary: Result<SummaryStats, SummaryError>,
}

impl ForecastReport {
    /// CSV bytes of the forecast horizon.
    pub fn export_csv(&self) -> Result<Vec<u8>, ExportError> {
        export(&self.forecast, self.horizon_days)
    }
}

#[derive(Clone)]
pub struct ForecastPipeline {
    cache: SeriesCache,
    engine: Arc<dyn ForecastEngine>,
}

impl ForecastPipeline {
    pub fn new(cache: SeriesCache, engine: Arc<dyn ForecastEngine>) -> Self {
        Self { cache, engine }
    }

    /// Pipeline using [`TrendSeasonalityEngine`].
    pub fn with_default_engine(cache: SeriesCache) -> Self {
        Self::new(cache, Arc::new(TrendSeasonalityEngine::default()))
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    /// Full cached history for `ticker`.
    pub async fn series(&self, ticker: &Ticker) -> Result<Arc<PriceSeries>, PipelineError> {
        self.cache
            .fetch(ticker)
            .await
            .ok_or_else(|| PipelineError::FetchFailure {
                ticker: ticker.clone(),
            })
    }

    /// Fetch, window, fit and summarize.
    pub async fn run(&self, request: &ForecastRequest) -> Result<ForecastReport, PipelineError> {
        let series = self.series(&request.ticker).await?;
        self.run_on(&series, request)
    }

    /// Window, fit and summarize an already fetched history.
    ///
    /// Callers that inspect the history first (for the offset range) use
    /// this to train on the same series without a second cache read.
    pub fn run_on(
        &self,
        series: &PriceSeries,
        request: &ForecastRequest,
    ) -> Result<ForecastReport, PipelineError> {
        let (window, points) = window::select(series, request.offset_days);

        if !window::has_enough_points(points.len()) {
            warn!(
                ticker = %request.ticker,
                offset_days = request.offset_days,
                points = points.len(),
                "training window too small"
            );
            return Err(PipelineError::InsufficientData {
                points: points.len(),
                required: MIN_TRAINING_POINTS + 1,
            });
        }

        let forecast = self.engine.forecast(&points, request.horizon_days)?;
        let summary = summarize(&forecast, request.horizon_days);

        match &summary {
            Ok(stats) => info!(
                ticker = %request.ticker,
                engine = self.engine.name(),
                training_points = points.len(),
                horizon_days = request.horizon_days,
                percent_change = stats.percent_change,
                trend = %stats.trend_label,
                "forecast complete"
            ),
            Err(error) => warn!(
                ticker = %request.ticker,
                code = error.code(),
                error = %error,
                "forecast summary unavailable"
            ),
        }

        let latest_price = points.last().map_or(series.latest_close(), |point| point.close);
        Ok(ForecastReport {
            ticker: request.ticker.clone(),
            window,
            training_points: points.len(),
            latest_price,
            horizon_days: request.horizon_days,
            forecast,
            summary,
        })
    }
}
