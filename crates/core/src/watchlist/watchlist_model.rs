//! Watchlist domain models.

use serde::{Deserialize, Serialize};

use crate::quotes::Quote;

/// Immutable reference data for one listed instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
}

/// One favorite with its latest quote, if the source had one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteQuote {
    pub instrument: Instrument,
    pub quote: Option<Quote>,
}
