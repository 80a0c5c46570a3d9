//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    /// This is a terminal error - retrying won't help.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider returned no usable data for the symbol.
    /// The symbol exists but the feed has nothing for it right now.
    #[error("No data available for symbol: {0}")]
    NoData(String),

    /// The provider rate limited the request.
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider returned data that failed validation checks.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },
}

impl MarketDataError {
    /// Returns true when the failure is per-symbol rather than systemic,
    /// meaning other symbols in the same batch may still succeed.
    pub fn is_symbol_scoped(&self) -> bool {
        matches!(
            self,
            MarketDataError::SymbolNotFound(_)
                | MarketDataError::NoData(_)
                | MarketDataError::ValidationFailed { .. }
        )
    }
}
