use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::ValidationError;

/// One forecast row: point estimate and uncertainty interval for a date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    #[serde(rename = "ds", with = "super::iso_date")]
    pub date: Date,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

impl ForecastRow {
    pub const fn new(date: Date, yhat: f64, yhat_lower: f64, yhat_upper: f64) -> Self {
        Self {
            date,
            yhat,
            yhat_lower,
            yhat_upper,
        }
    }
}

/// Forecast over the training span followed by the horizon.
///
/// Rows are strictly increasing by date and every row satisfies
/// `yhat_lower <= yhat <= yhat_upper`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    rows: Vec<ForecastRow>,
}

impl ForecastResult {
    pub fn new(rows: Vec<ForecastRow>) -> Result<Self, ValidationError> {
        for (index, row) in rows.iter().enumerate() {
            if !row.yhat.is_finite() {
                return Err(ValidationError::NonFiniteValue { field: "yhat" });
            }
            if !row.yhat_lower.is_finite() {
                return Err(ValidationError::NonFiniteValue {
                    field: "yhat_lower",
                });
            }
            if !row.yhat_upper.is_finite() {
                return Err(ValidationError::NonFiniteValue {
                    field: "yhat_upper",
                });
            }
            if row.yhat_lower > row.yhat || row.yhat > row.yhat_upper {
                return Err(ValidationError::InvalidForecastBounds { index });
            }
        }

        for pair in rows.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(ValidationError::UnorderedDates {
                    previous: pair[0].date.to_string(),
                    current: pair[1].date.to_string(),
                });
            }
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&ForecastRow> {
        self.rows.last()
    }

    /// The trailing `count` rows (all rows when `count` exceeds the length).
    pub fn tail(&self, count: usize) -> &[ForecastRow] {
        let start = self.rows.len().saturating_sub(count);
        &self.rows[start..]
    }
}

/// Direction of the projected move over the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    Bullish,
    Bearish,
}

impl TrendLabel {
    /// Strictly positive change is bullish; zero and below are bearish.
    pub fn from_percent_change(percent_change: f64) -> Self {
        if percent_change > 0.0 {
            Self::Bullish
        } else {
            Self::Bearish
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "Bullish (Upward)",
            Self::Bearish => "Bearish (Downward)",
        }
    }
}

impl Display for TrendLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived statistics for one forecast run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub percent_change: f64,
    pub trend_label: TrendLabel,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn row_serializes_date_as_ds() {
        let row = ForecastRow::new(date!(2024 - 03 - 09), 10.0, 9.0, 11.0);
        let value = serde_json::to_value(row).expect("serialize");
        assert_eq!(value["ds"], "2024-03-09");
        assert_eq!(value["yhat_upper"], 11.0);
    }

    #[test]
    fn rejects_inverted_bounds() {
        let rows = vec![
            ForecastRow::new(date!(2024 - 01 - 01), 10.0, 9.0, 11.0),
            ForecastRow::new(date!(2024 - 01 - 02), 10.0, 10.5, 11.0),
        ];
        let err = ForecastResult::new(rows).expect_err("must fail");
        assert_eq!(err, ValidationError::InvalidForecastBounds { index: 1 });
    }

    #[test]
    fn tail_saturates_at_full_length() {
        let rows = vec![
            ForecastRow::new(date!(2024 - 01 - 01), 1.0, 1.0, 1.0),
            ForecastRow::new(date!(2024 - 01 - 02), 2.0, 2.0, 2.0),
        ];
        let forecast = ForecastResult::new(rows).expect("valid forecast");
        assert_eq!(forecast.tail(1).len(), 1);
        assert_eq!(forecast.tail(5).len(), 2);
    }

    #[test]
    fn zero_change_is_bearish() {
        assert_eq!(TrendLabel::from_percent_change(0.0), TrendLabel::Bearish);
        assert_eq!(TrendLabel::from_percent_change(1e-9), TrendLabel::Bullish);
        assert_eq!(TrendLabel::from_percent_change(-3.0), TrendLabel::Bearish);
    }
}
