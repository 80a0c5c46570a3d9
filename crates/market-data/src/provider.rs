//! Market data provider trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{PricePoint, Quote};

/// Trait for market data providers.
///
/// Implement this trait to plug a concrete feed into the
/// [`MarketDataClient`](crate::client::MarketDataClient). Implementations
/// are expected to be cheap to call per symbol; batching and caching are
/// handled by the client, not the provider.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and error messages.
    fn id(&self) -> &'static str;

    /// Fetch the latest quote snapshot for a symbol.
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    /// Fetch the intraday price series for a symbol, ordered by timestamp
    /// ascending.
    async fn fetch_intraday(&self, symbol: &str) -> Result<Vec<PricePoint>, MarketDataError>;
}
