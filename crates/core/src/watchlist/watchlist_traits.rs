//! Persistence traits for the watchlist.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::Result;

use super::watchlist_model::Instrument;

/// Store trait for watchlist persistence.
///
/// Custom display names are a durable symbol-to-string mapping kept by the
/// store; malformed or missing mapping data is the store's problem to
/// report, and the service degrades it to "no custom names".
#[async_trait]
pub trait WatchlistStore: Send + Sync {
    /// Load all favorite instruments.
    async fn get_favorites(&self) -> Result<Vec<Instrument>>;

    /// Search listed instruments by symbol or name fragment.
    async fn search_instruments(&self, query: &str) -> Result<Vec<Instrument>>;

    /// Add a symbol to the favorites, optionally under a named group.
    async fn add_to_group(&self, symbol: &str, group: Option<&str>) -> Result<()>;

    /// Remove a symbol from the favorites.
    async fn remove(&self, symbol: &str) -> Result<()>;

    /// The symbol-to-display-name overrides.
    async fn get_custom_names(&self) -> Result<HashMap<String, String>>;

    /// Set or replace the display name override for one symbol.
    async fn set_custom_name(&self, symbol: &str, name: &str) -> Result<()>;
}
