//! Portfolio domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::quotes::PriceSource;

/// Transaction kind string identifiers (wire format of the store).
pub const TRANSACTION_KIND_BUY: &str = "buy";
pub const TRANSACTION_KIND_SELL: &str = "sell";

/// Capital transfer kind string identifiers.
pub const TRANSFER_KIND_DEPOSIT: &str = "deposit";
pub const TRANSFER_KIND_WITHDRAW: &str = "withdraw";

/// A position as the persistence collaborator stores it.
///
/// `current_price` is whatever price was last synced, if any; it seeds the
/// displayed price until the first refresh cycle completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub quantity: Decimal,
    pub avg_cost: Decimal,
    pub current_price: Option<Decimal>,
}

/// A holding with its derived valuation.
///
/// `current_price`, `market_value`, `profit`, and `profit_percent` are
/// recomputed on every valuation pass and never persisted independently of
/// each other. `id`, `symbol`, `quantity`, and `avg_cost` are owned by the
/// store and only change through explicit edit operations there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub quantity: Decimal,
    pub avg_cost: Decimal,
    pub current_price: Decimal,
    pub market_value: Decimal,
    pub profit: Decimal,
    pub profit_percent: Decimal,
    /// True on the degenerate path where no source produced a positive
    /// price; rendered as "no data" instead of a zero price.
    pub price_unavailable: bool,
    /// Which fallback step produced `current_price`.
    pub price_source: PriceSource,
}

impl Position {
    /// The fields a consumer can observe in a list view. Two positions that
    /// agree here are interchangeable for rendering purposes, so the
    /// reconciler keeps the previous instance.
    pub fn observably_equal(&self, other: &Position) -> bool {
        self.id == other.id
            && self.symbol == other.symbol
            && self.name == other.name
            && self.quantity == other.quantity
            && self.avg_cost == other.avg_cost
            && self.current_price == other.current_price
    }
}

/// Input model for creating a position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPosition {
    pub symbol: String,
    pub name: String,
    pub quantity: Decimal,
    pub avg_cost: Decimal,
    pub current_price: Option<Decimal>,
}

/// Input model for editing a position's stored fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    pub id: i64,
    pub quantity: Decimal,
    pub avg_cost: Decimal,
}

/// Buy/sell classification for a portfolio transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Buy,
    Sell,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Buy => TRANSACTION_KIND_BUY,
            TransactionKind::Sell => TRANSACTION_KIND_SELL,
        }
    }
}

impl From<&str> for TransactionKind {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            TRANSACTION_KIND_SELL => TransactionKind::Sell,
            _ => TransactionKind::Buy,
        }
    }
}

/// A recorded trade. Append-only from the core's perspective; edits and
/// deletions go through the store and trigger a full position reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub symbol: String,
    pub kind: TransactionKind,
    pub quantity: Decimal,
    pub price: Decimal,
    pub amount: Decimal,
    pub commission: Decimal,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

/// Input model for recording a trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub symbol: String,
    pub kind: TransactionKind,
    pub quantity: Decimal,
    pub price: Decimal,
    pub commission: Decimal,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

/// Input model for editing a recorded trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub id: i64,
    pub quantity: Decimal,
    pub price: Decimal,
    pub commission: Decimal,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

/// Deposit/withdraw classification for a capital transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferKind {
    Deposit,
    Withdraw,
}

impl TransferKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferKind::Deposit => TRANSFER_KIND_DEPOSIT,
            TransferKind::Withdraw => TRANSFER_KIND_WITHDRAW,
        }
    }
}

/// Cash moved into or out of the portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalTransfer {
    pub id: i64,
    pub kind: TransferKind,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

/// Input model for recording a capital transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCapitalTransfer {
    pub kind: TransferKind,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

/// Portfolio-level aggregates, recomputed after every reconcile pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_market_value: Decimal,
    pub total_cost: Decimal,
    pub total_profit: Decimal,
    pub total_profit_percent: Decimal,
    pub cash_balance: Decimal,
    pub total_value: Decimal,
}
