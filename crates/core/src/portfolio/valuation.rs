//! Position valuation arithmetic.
//!
//! Pure and total: no I/O, no failure paths, idempotent for identical
//! inputs. Runs for every position on every refresh tick, so the derived
//! quadruple is always internally consistent with the resolved price.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::quotes::{resolve_price, FetchedSymbolData, ResolvedPrice, StoredPriceInputs};

use super::portfolio_model::{Position, PositionRecord};

/// The derived valuation quadruple for one position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionValuation {
    pub current_price: Decimal,
    pub market_value: Decimal,
    pub profit: Decimal,
    pub profit_percent: Decimal,
}

/// Compute the valuation quadruple from stored quantity/cost and a resolved
/// price.
///
/// Invariants, exact under `Decimal` arithmetic:
/// - `market_value = quantity * current_price`
/// - `profit = (current_price - avg_cost) * quantity`
/// - `profit_percent = profit / (avg_cost * quantity) * 100` when the cost
///   basis is positive, `0` otherwise (covers both `avg_cost = 0` and the
///   zero-quantity position).
pub fn value_position(quantity: Decimal, avg_cost: Decimal, resolved_price: Decimal) -> PositionValuation {
    let market_value = quantity * resolved_price;
    let profit = (resolved_price - avg_cost) * quantity;
    let cost_basis = avg_cost * quantity;
    let profit_percent = if cost_basis > Decimal::ZERO {
        profit / cost_basis * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    PositionValuation {
        current_price: resolved_price,
        market_value,
        profit,
        profit_percent,
    }
}

/// Build a fully valued [`Position`] from its stored record and the fetched
/// market state for its symbol.
pub fn value_record(record: &PositionRecord, fetched: &FetchedSymbolData) -> Position {
    let stored = StoredPriceInputs {
        avg_cost: record.avg_cost,
        last_known_price: record.current_price,
    };
    let resolved = resolve_price(&stored, fetched);
    apply_resolved(record, &resolved)
}

/// Apply an already-resolved price to a stored record.
pub fn apply_resolved(record: &PositionRecord, resolved: &ResolvedPrice) -> Position {
    let valuation = value_position(record.quantity, record.avg_cost, resolved.price);
    Position {
        id: record.id,
        symbol: record.symbol.clone(),
        name: record.name.clone(),
        quantity: record.quantity,
        avg_cost: record.avg_cost,
        current_price: valuation.current_price,
        market_value: valuation.market_value,
        profit: valuation.profit,
        profit_percent: valuation.profit_percent,
        price_unavailable: !resolved.is_available(),
        price_source: resolved.source,
    }
}
