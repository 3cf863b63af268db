use std::f64::consts::PI;

use ndarray::{Array1, Array2};
use time::{Date, Duration};
use tracing::debug;

use super::linalg::solve_spd;
use super::{FitError, ForecastEngine, INTERVAL_WIDTH};
use crate::{ForecastResult, ForecastRow, PricePoint};

/// Two-sided standard normal quantile for [`INTERVAL_WIDTH`] coverage.
const Z_80: f64 = 1.281_551_565_544_600_4;

/// Assumed residual scale in normalized units; converts prior scales into
/// ridge penalties.
const NOISE_SCALE: f64 = 0.05;

/// Keeps the unpenalized trend columns strictly positive definite.
const RIDGE_JITTER: f64 = 1e-9;

const WEEKLY_PERIOD_DAYS: f64 = 7.0;
const YEARLY_PERIOD_DAYS: f64 = 365.25;
const WEEKLY_MIN_SPAN_DAYS: i64 = 14;
const YEARLY_MIN_SPAN_DAYS: i64 = 730;

/// Additive piecewise-linear trend with Fourier seasonality.
///
/// The model is `y(t) = (k + Σ aⱼ(t)·δⱼ)·t + m + weekly(t) + yearly(t)`,
/// fitted by ridge-regularized least squares on values scaled to `max|y|`
/// and time scaled to `[0, 1]` over the training span. Changepoints are
/// spread over the first 80% of the history; future rows extrapolate the
/// final slope across calendar days.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeasonalityEngine {
    n_changepoints: usize,
    changepoint_range: f64,
    changepoint_prior_scale: f64,
    seasonality_prior_scale: f64,
    weekly_order: usize,
    yearly_order: usize,
}

impl Default for TrendSeasonalityEngine {
    fn default() -> Self {
        Self {
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            weekly_order: 3,
            yearly_order: 10,
        }
    }
}

impl TrendSeasonalityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Larger values let the trend bend more at each changepoint.
    pub fn with_changepoint_prior_scale(mut self, scale: f64) -> Self {
        self.changepoint_prior_scale = scale;
        self
    }

    pub fn with_n_changepoints(mut self, count: usize) -> Self {
        self.n_changepoints = count;
        self
    }

    fn design(&self, training: &[PricePoint]) -> Design {
        let origin = training[0].date;
        let last = training[training.len() - 1].date;
        let span_days = (last - origin).whole_days();

        let hist_size = (training.len() as f64 * self.changepoint_range).floor() as usize;
        let count = self.n_changepoints.min(hist_size.saturating_sub(1));
        let changepoints = if count == 0 {
            Vec::new()
        } else {
            let step = (hist_size - 1) as f64 / count as f64;
            (1..=count)
                .map(|i| {
                    let index = (i as f64 * step).round() as usize;
                    (training[index].date - origin).whole_days() as f64 / span_days as f64
                })
                .collect()
        };

        let weekly_order = if span_days >= WEEKLY_MIN_SPAN_DAYS {
            self.weekly_order
        } else {
            0
        };
        let yearly_order = if span_days >= YEARLY_MIN_SPAN_DAYS {
            self.yearly_order
        } else {
            0
        };

        Design {
            origin,
            span_days: span_days as f64,
            changepoints,
            weekly_order,
            yearly_order,
        }
    }

    fn penalties(&self, design: &Design) -> Array1<f64> {
        let changepoint = (NOISE_SCALE / self.changepoint_prior_scale).powi(2);
        let seasonal = (NOISE_SCALE / self.seasonality_prior_scale).powi(2);

        let mut penalties = Vec::with_capacity(design.columns());
        penalties.extend([RIDGE_JITTER, RIDGE_JITTER]);
        penalties.extend(std::iter::repeat(changepoint).take(design.changepoints.len()));
        penalties.extend(
            std::iter::repeat(seasonal + RIDGE_JITTER)
                .take(2 * (design.weekly_order + design.yearly_order)),
        );
        Array1::from(penalties)
    }
}

impl ForecastEngine for TrendSeasonalityEngine {
    fn name(&self) -> &'static str {
        "trend-seasonality"
    }

    fn forecast(
        &self,
        training: &[PricePoint],
        horizon_days: u32,
    ) -> Result<ForecastResult, FitError> {
        validate(training)?;

        let last = training[training.len() - 1];
        let future_dates = (1..=i64::from(horizon_days))
            .map(|day| {
                last.date
                    .checked_add(Duration::days(day))
                    .ok_or(FitError::HorizonOverflow)
            })
            .collect::<Result<Vec<Date>, FitError>>()?;

        if training.iter().all(|point| point.close == training[0].close) {
            return flat_forecast(training, &future_dates);
        }

        let design = self.design(training);
        let scale = training
            .iter()
            .map(|point| point.close.abs())
            .fold(0.0_f64, f64::max);

        let n = training.len();
        let p = design.columns();
        let mut x = Array2::<f64>::zeros((n, p));
        let mut y = Array1::<f64>::zeros(n);
        for (i, point) in training.iter().enumerate() {
            for (j, value) in design.features(point.date).into_iter().enumerate() {
                x[[i, j]] = value;
            }
            y[i] = point.close / scale;
        }

        let mut gram = x.t().dot(&x);
        for (j, penalty) in self.penalties(&design).iter().enumerate() {
            gram[[j, j]] += penalty;
        }
        let rhs = x.t().dot(&y);
        let beta = solve_spd(&gram, &rhs).ok_or(FitError::Singular)?;

        let fitted = x.dot(&beta).mapv(|value| value * scale);
        let sse: f64 = training
            .iter()
            .zip(fitted.iter())
            .map(|(point, yhat)| (point.close - yhat).powi(2))
            .sum();
        let sigma = (sse / n as f64).sqrt();

        debug!(
            engine = self.name(),
            points = n,
            changepoints = design.changepoints.len(),
            columns = p,
            sigma,
            "trend model fitted"
        );

        let mut rows = Vec::with_capacity(n + future_dates.len());
        for (point, yhat) in training.iter().zip(fitted.iter()) {
            rows.push(interval_row(point.date, *yhat, Z_80 * sigma)?);
        }
        for (step, date) in future_dates.iter().enumerate() {
            let features = Array1::from(design.features(*date));
            let yhat = features.dot(&beta) * scale;
            let spread = (1.0 + (step + 1) as f64 / n as f64).sqrt();
            rows.push(interval_row(*date, yhat, Z_80 * sigma * spread)?);
        }

        ForecastResult::new(rows).map_err(|_| FitError::NonFiniteOutput)
    }
}

struct Design {
    origin: Date,
    span_days: f64,
    changepoints: Vec<f64>,
    weekly_order: usize,
    yearly_order: usize,
}

impl Design {
    fn columns(&self) -> usize {
        2 + self.changepoints.len() + 2 * (self.weekly_order + self.yearly_order)
    }

    fn features(&self, date: Date) -> Vec<f64> {
        let t = (date - self.origin).whole_days() as f64 / self.span_days;
        let mut row = Vec::with_capacity(self.columns());
        row.push(1.0);
        row.push(t);
        row.extend(self.changepoints.iter().map(|s| (t - s).max(0.0)));

        let day = f64::from(date.to_julian_day());
        fourier(&mut row, day, WEEKLY_PERIOD_DAYS, self.weekly_order);
        fourier(&mut row, day, YEARLY_PERIOD_DAYS, self.yearly_order);
        row
    }
}

fn fourier(row: &mut Vec<f64>, day: f64, period: f64, order: usize) {
    for k in 1..=order {
        let angle = 2.0 * PI * k as f64 * day / period;
        row.push(angle.sin());
        row.push(angle.cos());
    }
}

fn validate(training: &[PricePoint]) -> Result<(), FitError> {
    if training.len() < 2 {
        return Err(FitError::TooFewPoints {
            points: training.len(),
            required: 2,
        });
    }
    if let Some(index) = training.iter().position(|point| !point.close.is_finite()) {
        return Err(FitError::NonFiniteValue { index });
    }
    if let Some(index) = training
        .windows(2)
        .position(|pair| pair[1].date <= pair[0].date)
    {
        return Err(FitError::UnorderedDates { index: index + 1 });
    }
    Ok(())
}

fn interval_row(date: Date, yhat: f64, half_width: f64) -> Result<ForecastRow, FitError> {
    if !yhat.is_finite() || !half_width.is_finite() {
        return Err(FitError::NonFiniteOutput);
    }
    Ok(ForecastRow::new(date, yhat, yhat - half_width, yhat + half_width))
}

fn flat_forecast(training: &[PricePoint], future: &[Date]) -> Result<ForecastResult, FitError> {
    let level = training[0].close;
    let rows = training
        .iter()
        .map(|point| point.date)
        .chain(future.iter().copied())
        .map(|date| ForecastRow::new(date, level, level, level))
        .collect();
    ForecastResult::new(rows).map_err(|_| FitError::NonFiniteOutput)
}
