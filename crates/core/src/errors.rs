//! Core error types for the TickerTrack application.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! are converted to these types by the persistence layer.

use thiserror::Error;

use tickertrack_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the tracker application.
///
/// Persistence-specific errors are wrapped in string form to keep this type
/// storage-agnostic. Valuation, resolution, and reconciliation never produce
/// errors; only the I/O boundaries do.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Input validation failed: {0}")]
    Validation(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Storage-agnostic error type for persistence operations.
///
/// The persistence layer converts its own error types into this format, so
/// the core never depends on a concrete storage engine.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to reach the persistence collaborator.
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// A query or command failed to execute.
    #[error("Store query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A uniqueness or integrity constraint was violated.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Internal/unexpected store error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(err.to_string())
    }
}
