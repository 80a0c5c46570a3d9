//! Batching market data client with per-symbol TTL caching.
//!
//! The client is the single entry point the core uses to reach the feed.
//! It caches quote snapshots and intraday series independently (quotes go
//! stale faster than series), serves batch requests as one logical call
//! with internal fan-out, and supports explicit per-symbol invalidation so
//! a user-forced refresh can bypass the cache entirely.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use futures::future::join_all;
use log::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{PricePoint, Quote, SymbolData};
use crate::provider::MarketDataProvider;

/// How long a cached quote snapshot stays fresh.
pub const QUOTE_CACHE_TTL: Duration = Duration::from_secs(30);

/// How long a cached intraday series stays fresh.
pub const INTRADAY_CACHE_TTL: Duration = Duration::from_secs(60);

struct Cached<T> {
    value: T,
    fetched_at: Instant,
}

impl<T: Clone> Cached<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            fetched_at: Instant::now(),
        }
    }

    fn fresh(&self, ttl: Duration) -> Option<T> {
        (self.fetched_at.elapsed() < ttl).then(|| self.value.clone())
    }
}

/// Batching, caching facade over a [`MarketDataProvider`].
pub struct MarketDataClient {
    provider: Arc<dyn MarketDataProvider>,
    quotes: DashMap<String, Cached<Quote>>,
    intraday: DashMap<String, Cached<Vec<PricePoint>>>,
    quote_ttl: Duration,
    intraday_ttl: Duration,
}

impl MarketDataClient {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self::with_ttls(provider, QUOTE_CACHE_TTL, INTRADAY_CACHE_TTL)
    }

    /// Construct a client with explicit TTLs. Mainly for tests.
    pub fn with_ttls(
        provider: Arc<dyn MarketDataProvider>,
        quote_ttl: Duration,
        intraday_ttl: Duration,
    ) -> Self {
        Self {
            provider,
            quotes: DashMap::new(),
            intraday: DashMap::new(),
            quote_ttl,
            intraday_ttl,
        }
    }

    /// Fetch everything the source knows about one symbol.
    ///
    /// With `force_refresh`, cached entries for the symbol are dropped
    /// before fetching so the provider is always consulted. Per-field
    /// failures degrade to `None` rather than failing the whole lookup;
    /// only the result map's `is_empty` signals a fully dark symbol.
    pub async fn get_symbol_data(&self, symbol: &str, force_refresh: bool) -> SymbolData {
        if force_refresh {
            self.clear_cache(symbol);
        }

        let quote = match self.cached_quote(symbol) {
            Some(quote) => Some(quote),
            None => match self.provider.fetch_quote(symbol).await {
                Ok(quote) => {
                    self.quotes
                        .insert(symbol.to_string(), Cached::new(quote.clone()));
                    Some(quote)
                }
                Err(err) => {
                    debug!(
                        "quote fetch failed for {} via {}: {}",
                        symbol,
                        self.provider.id(),
                        err
                    );
                    None
                }
            },
        };

        let intraday = match self.cached_intraday(symbol) {
            Some(series) => Some(series),
            None => match self.provider.fetch_intraday(symbol).await {
                Ok(series) => {
                    self.intraday
                        .insert(symbol.to_string(), Cached::new(series.clone()));
                    Some(series)
                }
                Err(err) => {
                    debug!(
                        "intraday fetch failed for {} via {}: {}",
                        symbol,
                        self.provider.id(),
                        err
                    );
                    None
                }
            },
        };

        SymbolData { quote, intraday }
    }

    /// Fetch a batch of symbols as one logical call.
    ///
    /// Fan-out against the provider happens here; callers issue exactly one
    /// batch request per refresh tick. Every requested symbol is present in
    /// the result map, with an empty [`SymbolData`] when the source had
    /// nothing, so callers can compute the missing set by inspection.
    pub async fn get_batch_symbol_data(
        &self,
        symbols: &[String],
        force_refresh: bool,
    ) -> HashMap<String, SymbolData> {
        let fetches = symbols
            .iter()
            .map(|symbol| async move {
                let data = self.get_symbol_data(symbol, force_refresh).await;
                (symbol.clone(), data)
            })
            .collect::<Vec<_>>();

        let results: HashMap<String, SymbolData> = join_all(fetches).await.into_iter().collect();

        let dark = results.values().filter(|d| d.is_empty()).count();
        if dark > 0 {
            warn!("batch fetch: {}/{} symbols returned no data", dark, symbols.len());
        }

        results
    }

    /// Drop cached entries for a symbol so the next lookup hits the provider.
    pub fn clear_cache(&self, symbol: &str) {
        self.quotes.remove(symbol);
        self.intraday.remove(symbol);
    }

    /// Drop every cached entry.
    pub fn clear_all(&self) {
        self.quotes.clear();
        self.intraday.clear();
    }

    fn cached_quote(&self, symbol: &str) -> Option<Quote> {
        self.quotes
            .get(symbol)
            .and_then(|entry| entry.fresh(self.quote_ttl))
    }

    fn cached_intraday(&self, symbol: &str) -> Option<Vec<PricePoint>> {
        self.intraday
            .get(symbol)
            .and_then(|entry| entry.fresh(self.intraday_ttl))
    }
}
