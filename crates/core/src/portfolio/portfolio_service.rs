//! Portfolio service: CRUD delegation with reload-on-edit semantics.
//!
//! All mutations go through the store first and the in-memory view is only
//! rebuilt after the store confirms, so a failed destructive operation
//! leaves previously loaded state untouched. Any edit that can move
//! quantity or cost basis triggers a full position reload rather than a
//! local patch.

use std::sync::Arc;

use log::debug;
use rust_decimal::Decimal;

use crate::errors::Result;

use super::portfolio_model::{
    CapitalTransfer, NewCapitalTransfer, NewPosition, NewTransaction, PortfolioSummary, Position,
    PositionRecord, PositionUpdate, Transaction, TransactionKind, TransactionUpdate, TransferKind,
};
use super::portfolio_traits::PortfolioStore;

/// Service for portfolio reads and store-confirmed mutations.
pub struct PortfolioService {
    store: Arc<dyn PortfolioStore>,
}

impl PortfolioService {
    pub fn new(store: Arc<dyn PortfolioStore>) -> Self {
        Self { store }
    }

    /// Load the stored position set.
    pub async fn load_positions(&self) -> Result<Vec<PositionRecord>> {
        self.store.get_positions().await
    }

    /// Create a position, then reload the full set.
    pub async fn add_position(&self, new_position: &NewPosition) -> Result<Vec<PositionRecord>> {
        let id = self.store.add_position(new_position).await?;
        debug!("added position {} for {}", id, new_position.symbol);
        self.load_positions().await
    }

    /// Edit a position, then reload the full set.
    pub async fn update_position(&self, update: &PositionUpdate) -> Result<Vec<PositionRecord>> {
        self.store.update_position(update).await?;
        self.load_positions().await
    }

    /// Delete a position, then reload the full set.
    pub async fn delete_position(&self, position_id: i64) -> Result<Vec<PositionRecord>> {
        self.store.delete_position(position_id).await?;
        self.load_positions().await
    }

    pub async fn get_transactions(&self, symbol: Option<&str>) -> Result<Vec<Transaction>> {
        self.store.get_transactions(symbol).await
    }

    /// Record a trade, then reload positions; the store recomputes quantity
    /// and average cost from the transaction history.
    pub async fn add_transaction(
        &self,
        new_transaction: &NewTransaction,
    ) -> Result<Vec<PositionRecord>> {
        let id = self.store.add_transaction(new_transaction).await?;
        debug!(
            "recorded {} transaction {} for {}",
            new_transaction.kind.as_str(),
            id,
            new_transaction.symbol
        );
        self.load_positions().await
    }

    /// Edit a trade, then reload positions.
    pub async fn update_transaction(
        &self,
        update: &TransactionUpdate,
    ) -> Result<Vec<PositionRecord>> {
        self.store.update_transaction(update).await?;
        self.load_positions().await
    }

    /// Delete a trade, then reload positions.
    pub async fn delete_transaction(&self, transaction_id: i64) -> Result<Vec<PositionRecord>> {
        self.store.delete_transaction(transaction_id).await?;
        self.load_positions().await
    }

    pub async fn get_capital_transfers(&self) -> Result<Vec<CapitalTransfer>> {
        self.store.get_capital_transfers().await
    }

    pub async fn add_capital_transfer(&self, new_transfer: &NewCapitalTransfer) -> Result<i64> {
        self.store.add_capital_transfer(new_transfer).await
    }

    pub async fn delete_capital_transfer(&self, transfer_id: i64) -> Result<()> {
        self.store.delete_capital_transfer(transfer_id).await
    }

    pub async fn get_initial_balance(&self) -> Result<Decimal> {
        self.store.get_initial_balance().await
    }

    pub async fn set_initial_balance(&self, balance: Decimal) -> Result<()> {
        self.store.set_initial_balance(balance).await
    }

    /// Aggregate valued positions and cash movements into portfolio totals.
    ///
    /// Cash balance is the initial balance plus deposits minus withdrawals,
    /// minus cash spent on buys (amount plus commission) plus cash received
    /// from sells (amount minus commission).
    pub fn summarize(
        positions: &[Position],
        transactions: &[Transaction],
        transfers: &[CapitalTransfer],
        initial_balance: Decimal,
    ) -> PortfolioSummary {
        let mut total_market_value = Decimal::ZERO;
        let mut total_cost = Decimal::ZERO;
        for position in positions {
            total_market_value += position.market_value;
            total_cost += position.avg_cost * position.quantity;
        }
        let total_profit = total_market_value - total_cost;
        let total_profit_percent = if total_cost > Decimal::ZERO {
            total_profit / total_cost * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };

        let mut cash_balance = initial_balance;
        for transfer in transfers {
            match transfer.kind {
                TransferKind::Deposit => cash_balance += transfer.amount,
                TransferKind::Withdraw => cash_balance -= transfer.amount,
            }
        }
        for transaction in transactions {
            match transaction.kind {
                TransactionKind::Buy => {
                    cash_balance -= transaction.amount + transaction.commission
                }
                TransactionKind::Sell => {
                    cash_balance += transaction.amount - transaction.commission
                }
            }
        }

        PortfolioSummary {
            total_market_value,
            total_cost,
            total_profit,
            total_profit_percent,
            cash_balance,
            total_value: total_market_value + cash_balance,
        }
    }
}
