use thiserror::Error;

/// Validation and contract errors exposed by `trendcast-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    TickerInvalidChar { ch: char, index: usize },

    #[error("price series for '{ticker}' has no points")]
    EmptySeries { ticker: String },
    #[error("series dates must be strictly increasing: {previous} then {current}")]
    UnorderedDates { previous: String, current: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },

    #[error("forecast row {index} violates yhat_lower <= yhat <= yhat_upper")]
    InvalidForecastBounds { index: usize },

    #[error("horizon {value} is outside the supported range {min}..={max} days")]
    HorizonOutOfRange { value: u32, min: u32, max: u32 },

    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },
}
