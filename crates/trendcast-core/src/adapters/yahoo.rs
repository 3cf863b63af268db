use std::sync::Arc;

use serde::Deserialize;
use time::OffsetDateTime;

use crate::data_source::{HistoryFuture, HistoryProvider, ProviderId, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{DailyBar, Ticker};

const CHART_ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance daily history adapter.
///
/// Requests the full available range (`range=max`, `interval=1d`) and
/// reports split/dividend adjusted closes when Yahoo provides them.
#[derive(Clone)]
pub struct YahooHistoryAdapter {
    http_client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl Default for YahooHistoryAdapter {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::default()))
    }
}

impl YahooHistoryAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            timeout_ms: 30_000,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn chart_url(ticker: &Ticker) -> String {
        format!(
            "{CHART_ENDPOINT}/{}?range=max&interval=1d&includeAdjustedClose=true&events=div%2Csplit",
            urlencoding::encode(ticker.as_str())
        )
    }

    async fn fetch_history(&self, ticker: &Ticker) -> Result<Vec<DailyBar>, SourceError> {
        let request = HttpRequest::get(Self::chart_url(ticker))
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
        })?;

        if response.status == 404 {
            return Err(SourceError::not_found(format!(
                "yahoo has no chart for '{ticker}'"
            )));
        }

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        parse_chart_response(&response.body)
    }
}

impl HistoryProvider for YahooHistoryAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn history<'a>(&'a self, ticker: &'a Ticker) -> HistoryFuture<'a> {
        Box::pin(self.fetch_history(ticker))
    }
}

/// Parse a Yahoo v8 chart payload into daily rows.
///
/// Timestamps are shifted by the exchange `gmtoffset` before the calendar
/// date is taken, so a bar keeps the trading date of its exchange.
pub(crate) fn parse_chart_response(body: &str) -> Result<Vec<DailyBar>, SourceError> {
    let chart_response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = chart_response.chart.error {
        let message = format!(
            "yahoo chart API error: {}",
            error.description.unwrap_or(error.code)
        );
        return Err(SourceError::not_found(message));
    }

    let Some(result) = chart_response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
    else {
        return Ok(Vec::new());
    };

    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };

    let gmtoffset = result.meta.and_then(|meta| meta.gmtoffset).unwrap_or(0);
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .and_then(|series| series.into_iter().next())
        .map(|series| series.adjclose)
        .unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let local = OffsetDateTime::from_unix_timestamp(ts.saturating_add(gmtoffset))
            .map_err(|e| SourceError::internal(format!("invalid timestamp {ts}: {e}")))?;

        let close = adjclose
            .get(i)
            .copied()
            .flatten()
            .or_else(|| quote.close.get(i).copied().flatten());

        bars.push(DailyBar {
            date: local.date(),
            open: quote.open.get(i).copied().flatten(),
            high: quote.high.get(i).copied().flatten(),
            low: quote.low.get(i).copied().flatten(),
            close,
            volume: quote
                .volume
                .get(i)
                .copied()
                .flatten()
                .and_then(|v| u64::try_from(v).ok()),
        });
    }

    Ok(bars)
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooChartResult>>,
    error: Option<YahooChartError>,
}

#[derive(Debug, Deserialize)]
struct YahooChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    meta: Option<YahooChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooQuoteIndicator>,
    adjclose: Option<Vec<YahooAdjClose>>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooQuoteIndicator {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Deserialize)]
struct YahooAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, HttpResponse};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use time::macros::date;

    #[derive(Debug)]
    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn responding(response: Result<HttpResponse, HttpError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    const NEW_YORK_CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"currency": "USD", "symbol": "AAPL", "gmtoffset": -18000},
                "timestamp": [1704205800, 1704292200, 1704378600],
                "indicators": {
                    "quote": [{
                        "open": [187.15, 184.22, null],
                        "high": [188.44, 185.88, null],
                        "low": [183.89, 183.43, null],
                        "close": [185.64, 184.25, null],
                        "volume": [82488700, 58414500, null]
                    }],
                    "adjclose": [{"adjclose": [184.73, 183.35, null]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_chart_with_exchange_local_dates_and_adjusted_closes() {
        let bars = parse_chart_response(NEW_YORK_CHART).expect("chart should parse");

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, date!(2024 - 01 - 02));
        assert_eq!(bars[1].date, date!(2024 - 01 - 03));
        assert_eq!(bars[0].close, Some(184.73));
        assert_eq!(bars[0].volume, Some(82_488_700));
        assert_eq!(bars[2].close, None);
    }

    #[test]
    fn falls_back_to_raw_close_without_adjclose() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},
            "timestamp":[1704153600],
            "indicators":{"quote":[{"close":[42.5]}]}}],"error":null}}"#;

        let bars = parse_chart_response(body).expect("chart should parse");
        assert_eq!(bars[0].close, Some(42.5));
        assert_eq!(bars[0].date, date!(2024 - 01 - 02));
    }

    #[test]
    fn api_error_maps_to_not_found() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found",
            "description":"No data found, symbol may be delisted"}}}"#;

        let error = parse_chart_response(body).expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::NotFound);
        assert!(error.message().contains("symbol may be delisted"));
    }

    #[test]
    fn missing_timestamps_yield_no_rows() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},
            "indicators":{"quote":[{}]}}],"error":null}}"#;

        assert!(parse_chart_response(body).expect("parses").is_empty());
    }

    #[tokio::test]
    async fn history_requests_full_daily_range() {
        let client = Arc::new(RecordingHttpClient::responding(Ok(HttpResponse::ok_json(
            NEW_YORK_CHART,
        ))));
        let adapter = YahooHistoryAdapter::new(client.clone()).with_timeout_ms(5_000);
        let ticker = Ticker::parse("bp.l").expect("valid ticker");

        let bars = adapter.history(&ticker).await.expect("history should load");
        assert_eq!(bars.len(), 3);

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.contains("/chart/BP.L?range=max&interval=1d"));
        assert_eq!(requests[0].timeout_ms, 5_000);
    }

    #[tokio::test]
    async fn transport_failure_is_unavailable_and_not_retried() {
        let client = Arc::new(RecordingHttpClient::responding(Err(HttpError::new(
            "upstream timeout",
        ))));
        let adapter = YahooHistoryAdapter::new(client.clone());
        let ticker = Ticker::parse("MSFT").expect("valid ticker");

        let error = adapter.history(&ticker).await.expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert_eq!(client.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn status_404_is_not_found() {
        let client = Arc::new(RecordingHttpClient::responding(Ok(HttpResponse {
            status: 404,
            body: String::new(),
        })));
        let adapter = YahooHistoryAdapter::new(client);
        let ticker = Ticker::parse("NOPE").expect("valid ticker");

        let error = adapter.history(&ticker).await.expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::NotFound);
    }
}
