//! Price alert domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction string identifiers (wire format of the store).
pub const ALERT_DIRECTION_ABOVE: &str = "above";
pub const ALERT_DIRECTION_BELOW: &str = "below";

/// Which side of the threshold fires the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Above,
    Below,
}

impl AlertDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertDirection::Above => ALERT_DIRECTION_ABOVE,
            AlertDirection::Below => ALERT_DIRECTION_BELOW,
        }
    }
}

impl From<&str> for AlertDirection {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            ALERT_DIRECTION_BELOW => AlertDirection::Below,
            _ => AlertDirection::Above,
        }
    }
}

/// A price alert.
///
/// Lifecycle: created enabled and untriggered; `triggered` flips to true
/// when a quote crosses the threshold in the configured direction and stays
/// true until an explicit reset, even if the price later moves away.
/// Disabled alerts are retained but excluded from evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAlert {
    pub id: i64,
    pub symbol: String,
    pub threshold_price: Decimal,
    pub direction: AlertDirection,
    pub enabled: bool,
    pub triggered: bool,
}

/// Input model for creating an alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPriceAlert {
    pub symbol: String,
    pub threshold_price: Decimal,
    pub direction: AlertDirection,
}

/// Input model for editing an alert. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAlertUpdate {
    pub threshold_price: Option<Decimal>,
    pub direction: Option<AlertDirection>,
    pub enabled: Option<bool>,
}

/// Classification of an enabled alert against a current price.
///
/// Disabled alerts have no status at all; they are excluded from
/// evaluation, not mapped to a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertStatus {
    /// The threshold has been crossed (or was already crossed and not reset).
    Triggered,
    /// The price is within the proximity band of the threshold.
    Near,
    /// Armed, price comfortably away from the threshold.
    Active,
}

/// One alert's classification for a refresh pass, paired with the signed
/// distance between the current price and the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEvaluation {
    pub alert_id: i64,
    pub symbol: String,
    pub status: AlertStatus,
    /// Direction-sensitive signed percentage gap; non-negative means the
    /// threshold is already crossed. A display/consistency signal, not a
    /// trigger source.
    pub distance_percent: Decimal,
}
