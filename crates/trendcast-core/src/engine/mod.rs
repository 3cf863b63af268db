//! Trend forecasting capability.
//!
//! The pipeline only depends on the [`ForecastEngine`] contract: given
//! ordered `(date, value)` training points and a horizon in days, return one
//! [`ForecastRow`](crate::ForecastRow) per training date followed by one row
//! per calendar day of the horizon, each with an 80% interval.
//! Any engine honoring that shape and the `lower <= yhat <= upper` bound is
//! substitutable.

mod linalg;
mod trend;

use thiserror::Error;

use crate::{ForecastResult, PricePoint};

pub use trend::TrendSeasonalityEngine;

/// Fixed coverage of the forecast interval.
pub const INTERVAL_WIDTH: f64 = 0.80;

/// Reasons a model could not be fitted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FitError {
    #[error("need at least {required} training points to fit, got {points}")]
    TooFewPoints { points: usize, required: usize },
    #[error("training value at index {index} is not finite")]
    NonFiniteValue { index: usize },
    #[error("training dates must be strictly increasing (index {index})")]
    UnorderedDates { index: usize },
    #[error("model design is singular; the training data cannot identify a trend")]
    Singular,
    #[error("model produced a non-finite prediction")]
    NonFiniteOutput,
    #[error("forecast horizon runs past the supported calendar")]
    HorizonOverflow,
}

impl FitError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TooFewPoints { .. } => "fit.too_few_points",
            Self::NonFiniteValue { .. } => "fit.non_finite_value",
            Self::UnorderedDates { .. } => "fit.unordered_dates",
            Self::Singular => "fit.singular",
            Self::NonFiniteOutput => "fit.non_finite_output",
            Self::HorizonOverflow => "fit.horizon_overflow",
        }
    }
}

/// Forecasting capability behind a fixed input/output contract.
pub trait ForecastEngine: Send + Sync {
    /// Short engine name for logs and reports.
    fn name(&self) -> &'static str;

    /// Fit `training` and predict through `horizon_days` past its last date.
    ///
    /// # Errors
    ///
    /// Returns [`FitError`] when the model cannot be fitted.
    fn forecast(
        &self,
        training: &[PricePoint],
        horizon_days: u32,
    ) -> Result<ForecastResult, FitError>;
}
