//! Quote handling: price resolution over tiered data sources.
//!
//! - [`resolver`] - The fallback chain that derives one authoritative price
//!   per symbol from whatever the data source returned.
//!
//! The wire-level quote models live in the `tickertrack-market-data` crate
//! and are re-exported here for convenience.

pub mod resolver;


pub use resolver::{resolve_price, FetchedSymbolData, PriceSource, ResolvedPrice, StoredPriceInputs};

// Re-export wire models alongside the resolver that consumes them
pub use tickertrack_market_data::{PricePoint, Quote, SymbolData};
