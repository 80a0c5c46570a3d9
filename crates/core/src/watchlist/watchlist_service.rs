//! Watchlist service: favorites with quotes and display-name overrides.

use std::collections::HashMap;
use std::sync::Arc;

use log::warn;

use tickertrack_market_data::MarketDataClient;

use crate::errors::Result;

use super::watchlist_model::{FavoriteQuote, Instrument};
use super::watchlist_traits::WatchlistStore;

/// Service for the favorites list and its quote snapshots.
pub struct WatchlistService {
    store: Arc<dyn WatchlistStore>,
    client: Arc<MarketDataClient>,
}

impl WatchlistService {
    pub fn new(store: Arc<dyn WatchlistStore>, client: Arc<MarketDataClient>) -> Self {
        Self { store, client }
    }

    /// Load the favorite instruments with display-name overrides applied.
    ///
    /// A failure reading the name overrides is never fatal: it is logged
    /// and treated as "no overrides".
    pub async fn get_favorites(&self) -> Result<Vec<Instrument>> {
        let mut favorites = self.store.get_favorites().await?;
        let custom_names = match self.store.get_custom_names().await {
            Ok(names) => names,
            Err(err) => {
                warn!("failed to load custom display names, ignoring: {}", err);
                HashMap::new()
            }
        };
        for instrument in favorites.iter_mut() {
            if let Some(name) = custom_names.get(&instrument.symbol) {
                instrument.name = name.clone();
            }
        }
        Ok(favorites)
    }

    /// Favorites paired with their latest quotes, one batch call.
    pub async fn get_favorites_quotes(&self, force_refresh: bool) -> Result<Vec<FavoriteQuote>> {
        let favorites = self.get_favorites().await?;
        let symbols: Vec<String> = favorites.iter().map(|i| i.symbol.clone()).collect();
        let mut batch = self.client.get_batch_symbol_data(&symbols, force_refresh).await;

        Ok(favorites
            .into_iter()
            .map(|instrument| {
                let quote = batch
                    .remove(&instrument.symbol)
                    .and_then(|data| data.quote);
                FavoriteQuote { instrument, quote }
            })
            .collect())
    }

    pub async fn search_instruments(&self, query: &str) -> Result<Vec<Instrument>> {
        self.store.search_instruments(query).await
    }

    pub async fn add_to_group(&self, symbol: &str, group: Option<&str>) -> Result<()> {
        self.store.add_to_group(symbol, group).await
    }

    pub async fn remove(&self, symbol: &str) -> Result<()> {
        self.store.remove(symbol).await
    }

    pub async fn set_custom_name(&self, symbol: &str, name: &str) -> Result<()> {
        self.store.set_custom_name(symbol, name).await
    }
}
