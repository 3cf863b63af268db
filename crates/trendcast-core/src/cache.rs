//! Time-bounded in-memory cache of full price histories.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::data_source::HistoryProvider;
use crate::{PriceSeries, Ticker};

/// Default freshness window for a fetched series.
pub const DEFAULT_SERIES_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
struct CacheEntry {
    series: Arc<PriceSeries>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now <= self.expires_at
    }
}

type Slot = Arc<Mutex<Option<CacheEntry>>>;

struct CacheInner {
    provider: Arc<dyn HistoryProvider>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    slots: Mutex<HashMap<Ticker, Slot>>,
}

/// Per-ticker cache of [`PriceSeries`] with TTL expiry.
///
/// Each ticker owns an async slot lock that is held across the provider
/// call, so concurrent fetches of one ticker share a single upstream request.
/// Failed or empty fetches are never stored.
#[derive(Clone)]
pub struct SeriesCache {
    inner: Arc<CacheInner>,
}

impl SeriesCache {
    /// Create a cache over `provider` with the given freshness window.
    pub fn new(provider: Arc<dyn HistoryProvider>, ttl: Duration) -> Self {
        Self::with_clock(provider, ttl, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit time source.
    pub fn with_clock(
        provider: Arc<dyn HistoryProvider>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                provider,
                clock,
                ttl,
                slots: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Create a cache that never stores anything.
    pub fn disabled(provider: Arc<dyn HistoryProvider>) -> Self {
        Self::new(provider, Duration::ZERO)
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.ttl.is_zero()
    }

    /// Return the full history for `ticker`, or `None` when the provider
    /// fails or has no rows.
    ///
    /// A fresh cached series is returned as the same `Arc` without touching
    /// the provider.
    pub async fn fetch(&self, ticker: &Ticker) -> Option<Arc<PriceSeries>> {
        let slot = self.slot(ticker).await;
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref() {
            if cached.is_fresh(self.inner.clock.now()) {
                debug!(ticker = %ticker, "series cache hit");
                return Some(Arc::clone(&cached.series));
            }
        }

        debug!(ticker = %ticker, provider = %self.inner.provider.id(), "series cache miss");
        let fetched = self.load(ticker).await;

        *entry = match &fetched {
            Some(series) if !self.is_disabled() => Some(CacheEntry {
                series: Arc::clone(series),
                expires_at: self.inner.clock.now() + self.inner.ttl,
            }),
            _ => None,
        };

        fetched
    }

    /// Drop the cached series for `ticker`, if any.
    ///
    /// A fetch already in flight for `ticker` is left alone and its result is
    /// stored when it completes.
    pub async fn invalidate(&self, ticker: &Ticker) {
        self.retain_idle(|key, _| key != ticker).await;
    }

    /// Remove expired entries. Slots with an in-flight fetch are kept.
    pub async fn clear_expired(&self) {
        let now = self.inner.clock.now();
        self.retain_idle(|_, cached| cached.is_fresh(now)).await;
    }

    /// Remove every stored entry. Slots with an in-flight fetch are kept.
    pub async fn clear(&self) {
        self.retain_idle(|_, _| false).await;
    }

    /// Number of stored series, including expired ones not yet cleared.
    pub async fn len(&self) -> usize {
        let slots = self.inner.slots.lock().await;
        slots
            .values()
            .filter(|slot| slot.try_lock().is_ok_and(|entry| entry.is_some()))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn slot(&self, ticker: &Ticker) -> Slot {
        let mut slots = self.inner.slots.lock().await;
        Arc::clone(slots.entry(ticker.clone()).or_default())
    }

    /// Empty every idle slot whose entry fails `keep`.
    ///
    /// A slot leaves the map only when no caller holds it, so a ticker never
    /// ends up with two slots and two concurrent provider calls.
    async fn retain_idle(&self, mut keep: impl FnMut(&Ticker, &CacheEntry) -> bool) {
        let mut slots = self.inner.slots.lock().await;
        slots.retain(|ticker, slot| {
            let Ok(mut entry) = slot.try_lock() else {
                return true;
            };
            if entry.as_ref().is_some_and(|cached| keep(ticker, cached)) {
                return true;
            }
            *entry = None;
            drop(entry);
            Arc::strong_count(slot) > 1
        });
    }

    async fn load(&self, ticker: &Ticker) -> Option<Arc<PriceSeries>> {
        let rows = match self.inner.provider.history(ticker).await {
            Ok(rows) => rows,
            Err(error) => {
                warn!(ticker = %ticker, code = error.code(), error = %error, "history fetch failed");
                return None;
            }
        };

        if rows.is_empty() {
            warn!(ticker = %ticker, "provider returned no history rows");
            return None;
        }

        match PriceSeries::from_bars(ticker.clone(), rows) {
            Ok(series) => {
                debug!(ticker = %ticker, points = series.len(), "history normalized");
                Some(Arc::new(series))
            }
            Err(error) => {
                warn!(ticker = %ticker, error = %error, "history rows rejected");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::data_source::{HistoryFuture, ProviderId, SourceError};
    use crate::DailyBar;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use time::macros::date;

    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingProvider {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl HistoryProvider for CountingProvider {
        fn id(&self) -> ProviderId {
            ProviderId::Synthetic
        }

        fn history<'a>(&'a self, _ticker: &'a Ticker) -> HistoryFuture<'a> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let fail = self.fail;
            Box::pin(async move {
                if fail {
                    return Err(SourceError::unavailable("offline"));
                }
                Ok(vec![DailyBar::new(date!(2024 - 01 - 02), 100.0 + call as f64)])
            })
        }
    }

    fn ticker() -> Ticker {
        Ticker::parse("AAPL").expect("valid ticker")
    }

    #[tokio::test]
    async fn hit_returns_same_series_instance() {
        let provider = Arc::new(CountingProvider::new(false));
        let clock = Arc::new(ManualClock::default());
        let cache = SeriesCache::with_clock(provider.clone(), DEFAULT_SERIES_TTL, clock.clone());
        assert_eq!(cache.ttl(), DEFAULT_SERIES_TTL);

        let first = cache.fetch(&ticker()).await.expect("series");
        clock.advance(Duration::from_secs(3599));
        let second = cache.fetch(&ticker()).await.expect("series");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn expiry_triggers_refetch() {
        let provider = Arc::new(CountingProvider::new(false));
        let clock = Arc::new(ManualClock::default());
        let cache = SeriesCache::with_clock(provider.clone(), DEFAULT_SERIES_TTL, clock.clone());

        let first = cache.fetch(&ticker()).await.expect("series");
        clock.advance(Duration::from_secs(3601));
        let second = cache.fetch(&ticker()).await.expect("series");

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.latest_close(), 101.0);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn failures_collapse_to_none_and_are_not_cached() {
        let provider = Arc::new(CountingProvider::new(true));
        let cache = SeriesCache::new(provider.clone(), DEFAULT_SERIES_TTL);

        assert!(cache.fetch(&ticker()).await.is_none());
        assert!(cache.fetch(&ticker()).await.is_none());
        assert_eq!(provider.calls(), 2);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn disabled_cache_always_refetches() {
        let provider = Arc::new(CountingProvider::new(false));
        let cache = SeriesCache::disabled(provider.clone());

        assert!(cache.is_disabled());
        assert_eq!(cache.ttl(), Duration::ZERO);
        cache.fetch(&ticker()).await.expect("series");
        cache.fetch(&ticker()).await.expect("series");

        assert_eq!(provider.calls(), 2);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn invalidate_and_clear_expired() {
        let provider = Arc::new(CountingProvider::new(false));
        let clock = Arc::new(ManualClock::default());
        let cache =
            SeriesCache::with_clock(provider.clone(), Duration::from_secs(60), clock.clone());
        let msft = Ticker::parse("MSFT").expect("valid ticker");

        cache.fetch(&ticker()).await.expect("series");
        cache.fetch(&msft).await.expect("series");
        assert_eq!(cache.len().await, 2);

        cache.invalidate(&msft).await;
        assert_eq!(cache.len().await, 1);

        clock.advance(Duration::from_secs(61));
        cache.clear_expired().await;
        assert_eq!(cache.len().await, 0);

        cache.fetch(&ticker()).await.expect("series");
        cache.clear().await;
        assert!(cache.is_empty().await);
        assert_eq!(provider.calls(), 3);
    }
}
