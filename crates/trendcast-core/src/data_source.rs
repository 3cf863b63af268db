//! History provider trait and source error types.
//!
//! This module defines the adapter contract (`HistoryProvider`) that every
//! market-data provider implements. A provider returns the maximum daily
//! history it has for a ticker; the series cache normalizes the rows into a
//! [`PriceSeries`](crate::PriceSeries).
//!
//! # Example
//!
//! ```rust,ignore
//! use trendcast_core::{HistoryProvider, SourceError, Ticker, YahooHistoryAdapter};
//!
//! async fn latest_close(adapter: &YahooHistoryAdapter) -> Result<(), SourceError> {
//!     let ticker = Ticker::parse("AAPL").expect("valid ticker");
//!     let rows = adapter.history(&ticker).await?;
//!     if let Some(close) = rows.last().and_then(|row| row.close) {
//!         println!("{ticker}: {close:.2}");
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{DailyBar, Ticker};

/// Market-data provider identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    Yahoo,
    Synthetic,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
            Self::Synthetic => "synthetic",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    NotFound,
    InvalidRequest,
    Internal,
}

/// Structured provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Boxed future returned by [`HistoryProvider::history`].
pub type HistoryFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<DailyBar>, SourceError>> + Send + 'a>>;

/// Market-data provider contract.
///
/// Implementations must be `Send + Sync`; the series cache shares one
/// provider across tasks.
pub trait HistoryProvider: Send + Sync {
    /// Returns the provider identifier.
    fn id(&self) -> ProviderId;

    /// Fetches the maximum available daily history for `ticker`.
    ///
    /// One attempt per call; implementations never retry.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if:
    /// - The ticker is unknown to the provider
    /// - The provider is unreachable or answers with an error status
    /// - The payload cannot be parsed
    fn history<'a>(&'a self, ticker: &'a Ticker) -> HistoryFuture<'a>;
}
