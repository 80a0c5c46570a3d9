//! Configuration constants for refresh cadence and alert classification.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

/// How often the full quote/position refresh cycle runs.
pub const MARKET_DATA_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// How often alert evaluation runs. Cheaper than a full quote refresh, so it
/// runs on a tighter, unconditional cadence.
pub const ALERT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Proximity band for classifying an alert as "near" its threshold,
/// expressed as a percentage distance from the threshold price.
pub const ALERT_NEAR_BAND_PERCENT: Decimal = dec!(2);

/// How many individual retries a symbol gets after coming back empty from a
/// batch fetch.
pub const MISSING_SYMBOL_RETRY_LIMIT: usize = 1;
