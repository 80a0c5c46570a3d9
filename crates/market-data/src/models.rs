//! Market data models.
//!
//! These are the wire-level shapes handed back by providers: a live quote
//! snapshot per symbol and an ordered intraday price series. They carry no
//! derived valuation fields; that arithmetic belongs to the core crate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A live market quote snapshot for a single symbol.
///
/// Ephemeral and symbol-keyed: each fetch replaces the previous snapshot
/// wholesale. Only the latest snapshot per symbol is ever held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub volume: i64,
    pub high: Decimal,
    pub low: Decimal,
    pub open: Decimal,
    pub previous_close: Decimal,
    pub market_cap: Option<i64>,
    pub pe_ratio: Option<Decimal>,
    pub turnover: Option<i64>,
}

impl Quote {
    /// Returns true when the last-traded price is usable for valuation.
    pub fn has_live_price(&self) -> bool {
        self.price > Decimal::ZERO
    }
}

/// One OHLCV bar in an intraday or historical price series.
///
/// Series are ordered by `timestamp` ascending and replaced wholesale per
/// fetch; points are never merged individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: i64,
}

/// Everything the data source currently knows about one symbol.
///
/// Either field may be absent independently: a feed can serve a live quote
/// with no intraday series, or a series while the quote endpoint errors.
/// Both absent means the source had nothing for the symbol this round.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolData {
    pub quote: Option<Quote>,
    pub intraday: Option<Vec<PricePoint>>,
}

impl SymbolData {
    /// True when the source yielded neither a quote nor a series.
    pub fn is_empty(&self) -> bool {
        self.quote.is_none() && self.intraday.is_none()
    }
}
