use time::{Date, Duration, OffsetDateTime, Weekday};

use crate::data_source::{HistoryFuture, HistoryProvider, ProviderId, SourceError};
use crate::{DailyBar, Ticker};

/// Deterministic offline provider.
///
/// Produces a weekday-only random walk seeded from the ticker, so the same
/// ticker always yields the same history for a given end date.
#[derive(Debug, Clone)]
pub struct SyntheticHistoryProvider {
    end_date: Option<Date>,
    calendar_days: i64,
}

impl Default for SyntheticHistoryProvider {
    fn default() -> Self {
        Self {
            end_date: None,
            calendar_days: 5 * 365,
        }
    }
}

impl SyntheticHistoryProvider {
    pub fn with_end_date(mut self, end_date: Date) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_calendar_days(mut self, calendar_days: i64) -> Self {
        self.calendar_days = calendar_days;
        self
    }

    fn generate(&self, ticker: &Ticker) -> Result<Vec<DailyBar>, SourceError> {
        if self.calendar_days <= 0 {
            return Ok(Vec::new());
        }

        let end = self
            .end_date
            .unwrap_or_else(|| OffsetDateTime::now_utc().date());
        let start = end
            .checked_sub(Duration::days(self.calendar_days))
            .ok_or_else(|| SourceError::invalid_request("synthetic range underflows"))?;

        let seed = ticker_seed(ticker);
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut price = 20.0 + (seed % 480) as f64;
        let drift = ((seed % 7) as f64 - 3.0) * 1e-4;

        let mut bars = Vec::new();
        let mut date = start;
        while date <= end {
            if !matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday) {
                let shock = standard_normal(&mut rng) * 0.015;
                let open = price;
                price = (price * (drift + shock).exp()).max(0.01);
                let spread = price * 0.004;

                bars.push(DailyBar {
                    date,
                    open: Some(open),
                    high: Some(open.max(price) + spread),
                    low: Some((open.min(price) - spread).max(0.0)),
                    close: Some(price),
                    volume: Some(1_000_000 + rng.u64(0..500_000)),
                });
            }

            date = match date.next_day() {
                Some(next) => next,
                None => break,
            };
        }

        Ok(bars)
    }
}

impl HistoryProvider for SyntheticHistoryProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Synthetic
    }

    fn history<'a>(&'a self, ticker: &'a Ticker) -> HistoryFuture<'a> {
        Box::pin(async move { self.generate(ticker) })
    }
}

fn ticker_seed(ticker: &Ticker) -> u64 {
    ticker.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}

// Box-Muller transform.
fn standard_normal(rng: &mut fastrand::Rng) -> f64 {
    let u1 = rng.f64().max(f64::MIN_POSITIVE);
    let u2 = rng.f64();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[tokio::test]
    async fn same_ticker_yields_same_history() {
        let provider = SyntheticHistoryProvider::default()
            .with_end_date(date!(2024 - 06 - 28))
            .with_calendar_days(120);
        let ticker = Ticker::parse("AAPL").expect("valid ticker");

        let first = provider.history(&ticker).await.expect("history");
        let second = provider.history(&ticker).await.expect("history");

        assert_eq!(first, second);
        assert!(first.len() > 80);
        assert_eq!(first.last().map(|bar| bar.date), Some(date!(2024 - 06 - 28)));
    }

    #[tokio::test]
    async fn skips_weekends_and_keeps_prices_positive() {
        let provider = SyntheticHistoryProvider::default()
            .with_end_date(date!(2024 - 06 - 30))
            .with_calendar_days(60);
        let ticker = Ticker::parse("BTC-USD").expect("valid ticker");

        let bars = provider.history(&ticker).await.expect("history");

        for bar in &bars {
            assert!(!matches!(
                bar.date.weekday(),
                Weekday::Saturday | Weekday::Sunday
            ));
            assert!(bar.close.expect("close") > 0.0);
        }
    }
}
