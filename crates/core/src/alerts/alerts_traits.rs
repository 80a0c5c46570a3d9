//! Persistence traits for price alerts.

use async_trait::async_trait;

use crate::errors::Result;

use super::alerts_model::{NewPriceAlert, PriceAlert, PriceAlertUpdate};

/// Store trait for alert persistence.
///
/// `check_alerts` runs the store's own evaluation pass against its latest
/// persisted quotes and returns the alerts it newly marked triggered; the
/// core runs its own classification as well, against the reconciled
/// in-memory quotes, and persists those triggers through `mark_triggered`.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Load alerts, optionally restricted to one symbol.
    async fn get_alerts(&self, symbol: Option<&str>) -> Result<Vec<PriceAlert>>;

    /// Create an alert. Returns the alert id.
    async fn create_alert(&self, new_alert: &NewPriceAlert) -> Result<i64>;

    /// Edit an alert's threshold, direction, or enabled flag.
    async fn update_alert(&self, alert_id: i64, update: &PriceAlertUpdate) -> Result<()>;

    /// Server-side evaluation pass; returns newly triggered alerts.
    async fn check_alerts(&self) -> Result<Vec<PriceAlert>>;

    /// Persist the triggered flag for one alert.
    async fn mark_triggered(&self, alert_id: i64) -> Result<()>;

    /// Clear the triggered flag. This is the only way out of triggered.
    async fn reset_alert(&self, alert_id: i64) -> Result<()>;

    /// Remove an alert.
    async fn delete_alert(&self, alert_id: i64) -> Result<()>;
}
