//! CSV export of the forecast horizon.

use csv::Writer;
use thiserror::Error;

use crate::{ForecastResult, Ticker};

/// MIME type of the export artifact.
pub const EXPORT_MIME_TYPE: &str = "text/csv";

/// Column order of the export artifact.
pub const EXPORT_HEADER: [&str; 4] = ["ds", "yhat", "yhat_lower", "yhat_upper"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode forecast csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush forecast csv: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Csv(_) => "export.csv",
            Self::Io(_) => "export.io",
        }
    }
}

/// Encode the last `horizon_days` rows of `forecast` as UTF-8 CSV.
///
/// Dates are written as `YYYY-MM-DD` and no index column is emitted. When
/// the forecast holds fewer rows than the horizon every row is written.
pub fn export(forecast: &ForecastResult, horizon_days: u32) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;

    for row in forecast.tail(horizon_days as usize) {
        writer.write_record([
            row.date.to_string(),
            row.yhat.to_string(),
            row.yhat_lower.to_string(),
            row.yhat_upper.to_string(),
        ])?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|error| ExportError::Io(error.into_error()))
}

/// Download file name for `ticker`, e.g. `AAPL_forecast.csv`.
pub fn export_file_name(ticker: &Ticker) -> String {
    format!("{ticker}_forecast.csv")
}
