//! Contract tests for the forecast CSV export
//!
//! These tests pin the artifact consumers rely on: header, row count,
//! date format and interval ordering.

use std::sync::Arc;

use time::macros::date;
use trendcast_core::{
    export, export_file_name, parse_date, ForecastPipeline, ForecastRequest, SeriesCache,
    SyntheticHistoryProvider, Ticker, DEFAULT_SERIES_TTL, EXPORT_MIME_TYPE,
};

async fn synthetic_report(symbol: &str, horizon: u32) -> trendcast_core::ForecastReport {
    let provider = SyntheticHistoryProvider::default()
        .with_end_date(date!(2025 - 03 - 14))
        .with_calendar_days(3 * 365);
    let pipeline =
        ForecastPipeline::with_default_engine(SeriesCache::new(Arc::new(provider), DEFAULT_SERIES_TTL));
    let ticker = Ticker::parse(symbol).expect("valid ticker");
    let request = ForecastRequest::new(ticker, 0, horizon).expect("valid request");
    pipeline.run(&request).await.expect("forecast should succeed")
}

#[tokio::test]
async fn export_has_one_row_per_horizon_day() {
    // Given: A 45-day forecast
    let report = synthetic_report("VOD.L", 45).await;

    // When: The forecast is exported
    let bytes = export(&report.forecast, report.horizon_days).expect("export");
    let mut reader = csv::Reader::from_reader(bytes.as_slice());

    // Then: The header is fixed and there are exactly 45 records
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["ds", "yhat", "yhat_lower", "yhat_upper"]
    );

    let records: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("records");
    assert_eq!(records.len(), 45);

    // And: Dates are consecutive calendar days after the last training date
    let first = parse_date(&records[0][0]).expect("iso date");
    assert_eq!(first, date!(2025 - 03 - 15));
    let last = parse_date(&records[44][0]).expect("iso date");
    assert_eq!(last, date!(2025 - 04 - 28));
}

#[tokio::test]
async fn every_exported_row_keeps_interval_order() {
    // Given: A long-horizon forecast
    let report = synthetic_report("ETH-USD", 365).await;

    // When: The forecast is exported through the report helper
    let bytes = report.export_csv().expect("export");
    let mut reader = csv::Reader::from_reader(bytes.as_slice());

    // Then: lower <= yhat <= upper on every row
    for record in reader.records() {
        let record = record.expect("record");
        let yhat: f64 = record[1].parse().expect("yhat");
        let lower: f64 = record[2].parse().expect("lower");
        let upper: f64 = record[3].parse().expect("upper");
        assert!(lower <= yhat && yhat <= upper, "row {record:?}");
    }
}

#[tokio::test]
async fn export_is_deterministic_for_the_same_forecast() {
    // Given: One forecast
    let report = synthetic_report("SAP.DE", 30).await;

    // When/Then: Exporting twice yields identical bytes
    assert_eq!(
        report.export_csv().expect("export"),
        report.export_csv().expect("export")
    );
}

#[test]
fn artifact_name_and_type_follow_ticker() {
    let ticker = Ticker::parse("7203.t").expect("valid ticker");
    assert_eq!(export_file_name(&ticker), "7203.T_forecast.csv");
    assert_eq!(EXPORT_MIME_TYPE, "text/csv");
}
