//! Persistence traits for the portfolio.
//!
//! The store owns positions, transactions, capital transfers, and the
//! initial balance. The core reaches it through this command-style trait
//! and never assumes anything about the storage engine behind it.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::Result;

use super::portfolio_model::{
    CapitalTransfer, NewCapitalTransfer, NewPosition, NewTransaction, PositionRecord,
    PositionUpdate, Transaction, TransactionUpdate,
};

/// Store trait for portfolio persistence.
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    /// Load the full set of stored positions.
    async fn get_positions(&self) -> Result<Vec<PositionRecord>>;

    /// Create a position (or merge into an existing one for the same
    /// symbol; the store owns that policy). Returns the position id.
    async fn add_position(&self, new_position: &NewPosition) -> Result<i64>;

    /// Edit a position's stored quantity and average cost.
    async fn update_position(&self, update: &PositionUpdate) -> Result<()>;

    /// Remove a position.
    async fn delete_position(&self, position_id: i64) -> Result<()>;

    /// Load transactions, optionally restricted to one symbol.
    async fn get_transactions(&self, symbol: Option<&str>) -> Result<Vec<Transaction>>;

    /// Record a trade. Returns the transaction id.
    async fn add_transaction(&self, new_transaction: &NewTransaction) -> Result<i64>;

    /// Edit a recorded trade.
    async fn update_transaction(&self, update: &TransactionUpdate) -> Result<()>;

    /// Remove a recorded trade.
    async fn delete_transaction(&self, transaction_id: i64) -> Result<()>;

    /// Load all capital transfers.
    async fn get_capital_transfers(&self) -> Result<Vec<CapitalTransfer>>;

    /// Record a capital transfer. Returns the transfer id.
    async fn add_capital_transfer(&self, new_transfer: &NewCapitalTransfer) -> Result<i64>;

    /// Remove a capital transfer.
    async fn delete_capital_transfer(&self, transfer_id: i64) -> Result<()>;

    /// The user's configured starting cash balance.
    async fn get_initial_balance(&self) -> Result<Decimal>;

    /// Set the starting cash balance.
    async fn set_initial_balance(&self, balance: Decimal) -> Result<()>;
}
