//! # Domain Models
//!
//! Canonical domain types for trendcast.
//!
//! ## Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Validated, uppercase market ticker |
//! | [`DailyBar`] | Raw daily provider row |
//! | [`PricePoint`] | Timezone-naive daily close |
//! | [`PriceSeries`] | Ordered close history for one ticker |
//! | [`ForecastRow`] | Point estimate with 80% interval for a date |
//! | [`ForecastResult`] | Training span plus horizon rows |
//! | [`SummaryStats`] | Percent change, trend label and final bounds |
//!
//! ## Validation
//!
//! Constructors enforce the invariants, so a [`PriceSeries`] is never empty
//! and a [`ForecastResult`] never has an inverted interval:
//!
//! ```rust
//! use trendcast_core::{ForecastResult, ForecastRow, ValidationError};
//! use time::macros::date;
//!
//! let rows = vec![ForecastRow::new(date!(2024 - 01 - 01), 10.0, 11.0, 12.0)];
//! assert!(matches!(
//!     ForecastResult::new(rows),
//!     Err(ValidationError::InvalidForecastBounds { index: 0 })
//! ));
//! ```

mod forecast;
mod series;
mod ticker;

pub use forecast::{ForecastResult, ForecastRow, SummaryStats, TrendLabel};
pub use series::{parse_date, DailyBar, PricePoint, PriceSeries};
pub use ticker::Ticker;

use time::Date;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");
