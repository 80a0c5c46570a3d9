//! Authoritative price resolution.
//!
//! Every holding and watched symbol needs exactly one current price before
//! valuation runs. The sources disagree in freshness and availability, so
//! resolution walks a fixed fallback chain, taking the first positive value:
//!
//! 1. Live trade price - most authoritative while the market is open.
//! 2. Previous close - best same-session fallback when the market is closed
//!    or the feed lags.
//! 3. Last intraday close - covers feed gaps on the quote endpoint.
//! 4. Average cost - keeps valuation arithmetic total when every market
//!    source is dark.
//!
//! When even average cost is zero the result is the degenerate "no data"
//! price, surfaced through [`ResolvedPrice::is_available`] rather than a
//! numeric sentinel.
//!
//! The chain is expressed as an ordered candidate list so the order itself
//! is data, not nested conditionals, and each step stays independently
//! testable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tickertrack_market_data::SymbolData;

/// The fetched side of a resolution: whatever the data source currently
/// knows about the symbol.
pub type FetchedSymbolData = SymbolData;

/// The locally persisted inputs to price resolution.
///
/// `last_known_price` is the price stored with the position at its last
/// successful sync. It does not participate in the fallback chain; callers
/// use it to seed the displayed price before the first refresh completes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoredPriceInputs {
    pub avg_cost: Decimal,
    pub last_known_price: Option<Decimal>,
}

/// Which step of the fallback chain produced the resolved price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceSource {
    /// Live trade price from the quote snapshot.
    Live,
    /// Previous session close from the quote snapshot.
    PreviousClose,
    /// Closing price of the last intraday bar.
    HistoricalClose,
    /// The position's own average cost.
    CostBasis,
    /// Nothing usable; price is zero and must be displayed as "no data".
    Unavailable,
}

/// A resolved price together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPrice {
    pub price: Decimal,
    pub source: PriceSource,
}

impl ResolvedPrice {
    /// False only on the degenerate path where every source, including
    /// average cost, yielded nothing positive.
    pub fn is_available(&self) -> bool {
        self.source != PriceSource::Unavailable
    }
}

/// Resolve the single authoritative price for one symbol.
///
/// Total over all inputs: never fails, never divides, never returns a
/// negative price. Each fallback step is consulted only when every earlier
/// step yielded no positive value.
pub fn resolve_price(stored: &StoredPriceInputs, fetched: &FetchedSymbolData) -> ResolvedPrice {
    let candidates = [
        (
            PriceSource::Live,
            fetched.quote.as_ref().map(|q| q.price),
        ),
        (
            PriceSource::PreviousClose,
            fetched.quote.as_ref().map(|q| q.previous_close),
        ),
        (
            PriceSource::HistoricalClose,
            fetched
                .intraday
                .as_ref()
                .and_then(|series| series.last())
                .map(|point| point.close),
        ),
        (PriceSource::CostBasis, Some(stored.avg_cost)),
    ];

    for (source, candidate) in candidates {
        if let Some(price) = candidate {
            if price > Decimal::ZERO {
                return ResolvedPrice { price, source };
            }
        }
    }

    ResolvedPrice {
        price: Decimal::ZERO,
        source: PriceSource::Unavailable,
    }
}
