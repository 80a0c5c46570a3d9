//! Portfolio management: positions, transactions, capital transfers,
//! and the valuation pass that derives market value and profit from
//! resolved prices.
//!
//! - [`portfolio_model`] - Domain models for positions and cash movements
//! - [`portfolio_traits`] - The persistence collaborator boundary
//! - [`valuation`] - The pure valuation arithmetic
//! - [`portfolio_service`] - CRUD delegation with reload-on-edit semantics

pub mod portfolio_model;
pub mod portfolio_service;
pub mod portfolio_traits;
pub mod valuation;


pub use portfolio_model::{
    CapitalTransfer, NewCapitalTransfer, NewPosition, NewTransaction, PortfolioSummary, Position,
    PositionRecord, PositionUpdate, Transaction, TransactionKind, TransactionUpdate, TransferKind,
};
pub use portfolio_service::PortfolioService;
pub use portfolio_traits::PortfolioStore;
pub use valuation::{value_position, PositionValuation};
