//! TickerTrack Core - Domain entities, services, and traits.
//!
//! This crate contains the valuation-and-synchronization engine for
//! TickerTrack: price resolution, position valuation, incremental
//! reconciliation of fetched market state, price alert evaluation, and
//! refresh scheduling. It is storage-agnostic and defines traits that are
//! implemented by the persistence layer.

pub mod alerts;
pub mod constants;
pub mod errors;
pub mod portfolio;
pub mod quotes;
pub mod sync;
pub mod utils;
pub mod watchlist;

// Re-export common types
pub use portfolio::*;
pub use quotes::{resolve_price, FetchedSymbolData, PriceSource, ResolvedPrice, StoredPriceInputs};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
