use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::Date;

use crate::{Ticker, ValidationError};

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<Date, ValidationError> {
    Date::parse(input.trim(), format_description!("[year]-[month]-[day]")).map_err(|_| {
        ValidationError::InvalidDate {
            value: input.to_owned(),
        }
    })
}

/// One daily row as returned by a market-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    #[serde(with = "super::iso_date")]
    pub date: Date,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

impl DailyBar {
    pub fn new(date: Date, close: f64) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close: Some(close),
            volume: None,
        }
    }
}

/// Timezone-naive daily closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(with = "super::iso_date")]
    pub date: Date,
    pub close: f64,
}

impl PricePoint {
    pub const fn new(date: Date, close: f64) -> Self {
        Self { date, close }
    }
}

/// Full daily closing-price history for one ticker.
///
/// Points are non-empty, finite and strictly increasing by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    ticker: Ticker,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(ticker: Ticker, points: Vec<PricePoint>) -> Result<Self, ValidationError> {
        if points.is_empty() {
            return Err(ValidationError::EmptySeries {
                ticker: ticker.to_string(),
            });
        }

        for point in &points {
            if !point.close.is_finite() {
                return Err(ValidationError::NonFiniteValue { field: "close" });
            }
        }

        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(ValidationError::UnorderedDates {
                    previous: pair[0].date.to_string(),
                    current: pair[1].date.to_string(),
                });
            }
        }

        Ok(Self { ticker, points })
    }

    /// Build a series from raw provider rows.
    ///
    /// Rows without a finite close are dropped, rows are sorted by date and
    /// the last row wins when several share a date.
    pub fn from_bars(ticker: Ticker, bars: Vec<DailyBar>) -> Result<Self, ValidationError> {
        let mut points = bars
            .into_iter()
            .filter_map(|bar| match bar.close {
                Some(close) if close.is_finite() => Some(PricePoint::new(bar.date, close)),
                _ => None,
            })
            .collect::<Vec<_>>();

        // Stable sort keeps provider order among equal dates.
        points.sort_by_key(|point| point.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Self::new(ticker, deduped)
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn earliest_date(&self) -> Date {
        self.points[0].date
    }

    pub fn latest_date(&self) -> Date {
        self.points[self.points.len() - 1].date
    }

    pub fn latest_close(&self) -> f64 {
        self.points[self.points.len() - 1].close
    }

    /// Calendar days between the earliest and the latest point.
    pub fn total_days(&self) -> i64 {
        (self.latest_date() - self.earliest_date()).whole_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn ticker() -> Ticker {
        Ticker::parse("AAPL").expect("valid ticker")
    }

    #[test]
    fn rejects_empty_series() {
        let err = PriceSeries::new(ticker(), Vec::new()).expect_err("must fail");
        assert!(matches!(err, ValidationError::EmptySeries { .. }));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let points = vec![
            PricePoint::new(date!(2024 - 01 - 02), 10.0),
            PricePoint::new(date!(2024 - 01 - 02), 11.0),
        ];
        let err = PriceSeries::new(ticker(), points).expect_err("must fail");
        assert!(matches!(err, ValidationError::UnorderedDates { .. }));
    }

    #[test]
    fn from_bars_sorts_dedupes_and_drops_missing_closes() {
        let bars = vec![
            DailyBar::new(date!(2024 - 01 - 03), 12.0),
            DailyBar::new(date!(2024 - 01 - 02), 10.0),
            DailyBar {
                close: None,
                ..DailyBar::new(date!(2024 - 01 - 04), 0.0)
            },
            DailyBar::new(date!(2024 - 01 - 03), 12.5),
            DailyBar::new(date!(2024 - 01 - 05), f64::NAN),
        ];

        let series = PriceSeries::from_bars(ticker(), bars).expect("series should build");

        assert_eq!(series.len(), 2);
        assert_eq!(series.earliest_date(), date!(2024 - 01 - 02));
        assert_eq!(series.latest_date(), date!(2024 - 01 - 03));
        assert_eq!(series.latest_close(), 12.5);
        assert_eq!(series.total_days(), 1);
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_date("2024-03-09"), Ok(date!(2024 - 03 - 09)));
        assert!(parse_date("03/09/2024").is_err());
    }
}
