//! Trend direction and confidence bounds derived from a forecast.

use thiserror::Error;
use time::Date;

use crate::{ForecastResult, SummaryStats, TrendLabel};

/// Reasons a summary cannot be derived. The forecast itself stays valid.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SummaryError {
    #[error("forecast value at the horizon boundary ({date}) is zero; percent change is undefined")]
    ZeroBaseline { date: Date },
    #[error("horizon of {horizon} days does not fit a forecast of {rows} rows")]
    HorizonOutOfRange { horizon: u32, rows: usize },
}

impl SummaryError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ZeroBaseline { .. } => "summary.zero_baseline",
            Self::HorizonOutOfRange { .. } => "summary.horizon_out_of_range",
        }
    }
}

/// Summarize the last `horizon_days` rows of `forecast`.
///
/// The baseline is the first row of the horizon tail and the end value is
/// the last row; bounds come from the last row only. A zero change is
/// labeled bearish.
///
/// # Errors
///
/// Returns [`SummaryError`] when the boundary row is missing or its value
/// is zero.
pub fn summarize(
    forecast: &ForecastResult,
    horizon_days: u32,
) -> Result<SummaryStats, SummaryError> {
    let rows = forecast.rows();
    let horizon = horizon_days as usize;
    if horizon == 0 || horizon > rows.len() {
        return Err(SummaryError::HorizonOutOfRange {
            horizon: horizon_days,
            rows: rows.len(),
        });
    }

    let start = rows[rows.len() - horizon];
    let end = rows[rows.len() - 1];
    if start.yhat == 0.0 {
        return Err(SummaryError::ZeroBaseline { date: start.date });
    }

    let percent_change = (end.yhat - start.yhat) / start.yhat * 100.0;
    Ok(SummaryStats {
        percent_change,
        trend_label: TrendLabel::from_percent_change(percent_change),
        lower_bound: end.yhat_lower,
        upper_bound: end.yhat_upper,
    })
}

/// Human-readable statistical summary.
pub fn describe(stats: &SummaryStats, training_start: Date, horizon_days: u32) -> String {
    format!(
        "Based on historical patterns from {training_start} to today, the model identifies a \
         {label} trend for the next {horizon_days} days.\n\
         \n\
         * Projected Change: {change:.2}%\n\
         * Conservative Estimate: {lower:.2}\n\
         * Optimistic Estimate: {upper:.2}\n\
         \n\
         Note: the band is the 80% confidence interval.",
        label = stats.trend_label,
        change = stats.percent_change,
        lower = stats.lower_bound,
        upper = stats.upper_bound,
    )
}
