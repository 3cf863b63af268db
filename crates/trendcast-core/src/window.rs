//! Training window selection.
//!
//! Two independent size rules apply to a training window:
//!
//! - the **slider bound**: offsets range over `0..=total_days - 30`, checked
//!   by the front end through [`max_offset`];
//! - the **runtime gate**: the pipeline refuses to fit unless the selected
//!   window holds more than [`MIN_TRAINING_POINTS`] points.
//!
//! A valid slider offset can still leave too few trading days to pass the
//! gate.

use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::{PricePoint, PriceSeries};

/// Trailing calendar days the slider keeps selectable.
pub const SLIDER_RESERVE_DAYS: i64 = 30;

/// The pipeline requires strictly more points than this.
pub const MIN_TRAINING_POINTS: usize = 20;

/// Date range used to fit the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingWindow {
    #[serde(with = "window_date")]
    pub start_date: Date,
    #[serde(with = "window_date")]
    pub end_date: Date,
    pub offset_days: u32,
}

time::serde::format_description!(window_date, Date, "[year]-[month]-[day]");

/// Largest offset the slider allows, or `None` when the series spans fewer
/// than [`SLIDER_RESERVE_DAYS`] days.
pub fn max_offset(series: &PriceSeries) -> Option<u32> {
    let max = series.total_days() - SLIDER_RESERVE_DAYS;
    u32::try_from(max).ok()
}

/// Whether `offset_days` lies within the slider range for `series`.
pub fn offset_in_slider_range(series: &PriceSeries, offset_days: u32) -> bool {
    max_offset(series).is_some_and(|max| offset_days <= max)
}

/// Select the training window starting `offset_days` after the earliest date.
///
/// Returns every point dated on or after the start date, ascending. The
/// result may be empty when the offset runs past the latest date.
pub fn select(series: &PriceSeries, offset_days: u32) -> (TrainingWindow, Vec<PricePoint>) {
    let start_date = series
        .earliest_date()
        .checked_add(Duration::days(i64::from(offset_days)))
        .unwrap_or(Date::MAX);

    let first = series
        .points()
        .partition_point(|point| point.date < start_date);
    let filtered = series.points()[first..].to_vec();

    let window = TrainingWindow {
        start_date,
        end_date: series.latest_date(),
        offset_days,
    };

    (window, filtered)
}

/// Whether a filtered window is large enough to fit.
pub const fn has_enough_points(points: usize) -> bool {
    points > MIN_TRAINING_POINTS
}
