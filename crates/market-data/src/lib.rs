//! TickerTrack Market Data Crate
//!
//! Provider-agnostic market data fetching for the TickerTrack application.
//!
//! # Overview
//!
//! This crate sits between the core domain logic and whatever feed actually
//! serves quotes. It provides:
//!
//! - Domain-neutral models for live quotes and intraday price points
//! - The [`MarketDataProvider`] trait that concrete feeds implement
//! - [`MarketDataClient`], a batching facade with per-symbol TTL caching
//!   and explicit cache invalidation for user-forced refreshes
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |   Core Domain    |  (resolution, valuation, reconciliation)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! | MarketDataClient |  (batching, TTL cache, force refresh)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |     Provider     |  (concrete feed implementation)
//! +------------------+
//! ```
//!
//! The client issues one logical batch call per request; fan-out against the
//! underlying provider happens inside the client, so callers never manage
//! per-symbol request concurrency themselves.

pub mod client;
pub mod errors;
pub mod models;
pub mod provider;

pub use client::MarketDataClient;
pub use errors::MarketDataError;
pub use models::{PricePoint, Quote, SymbolData};
pub use provider::MarketDataProvider;
