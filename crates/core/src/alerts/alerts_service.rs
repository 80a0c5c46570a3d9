//! Alert classification and the trigger lifecycle.
//!
//! Classification is pure: an enabled alert and a current price map to one
//! of `{triggered, near, active}`. Trigger persistence is sticky - once an
//! alert is marked triggered it stays triggered until an explicit reset, so
//! a price oscillating around the threshold cannot flap the alert.

use std::collections::HashMap;
use std::sync::Arc;

use log::{info, warn};
use rust_decimal::Decimal;

use crate::constants::ALERT_NEAR_BAND_PERCENT;
use crate::errors::Result;
use crate::quotes::Quote;

use super::alerts_model::{
    AlertDirection, AlertEvaluation, AlertStatus, NewPriceAlert, PriceAlert, PriceAlertUpdate,
};
use super::alerts_traits::AlertStore;

/// Signed, direction-sensitive percentage gap between price and threshold.
///
/// For `above`: `(price - threshold) / threshold * 100`; for `below`:
/// `(threshold - price) / threshold * 100`. Either way a non-negative value
/// means the threshold is already crossed - a display/consistency signal,
/// never a trigger source. Total: a non-positive threshold yields zero
/// rather than dividing by it.
pub fn distance_percent(direction: AlertDirection, threshold: Decimal, price: Decimal) -> Decimal {
    if threshold <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let gap = match direction {
        AlertDirection::Above => price - threshold,
        AlertDirection::Below => threshold - price,
    };
    gap / threshold * Decimal::ONE_HUNDRED
}

/// Classify an alert against a current price.
///
/// Returns `None` for disabled alerts - they have no status. An alert whose
/// persisted `triggered` flag is already set classifies as `Triggered`
/// regardless of where the price is now (sticky until reset). Otherwise the
/// threshold check fires `Triggered`, the proximity band yields `Near`, and
/// everything else is `Active`.
pub fn classify(alert: &PriceAlert, price: Decimal, near_band: Decimal) -> Option<AlertStatus> {
    if !alert.enabled {
        return None;
    }
    if alert.triggered {
        return Some(AlertStatus::Triggered);
    }

    let crossed = match alert.direction {
        AlertDirection::Above => price >= alert.threshold_price,
        AlertDirection::Below => price <= alert.threshold_price,
    };
    if crossed {
        return Some(AlertStatus::Triggered);
    }

    let distance = distance_percent(alert.direction, alert.threshold_price, price);
    if distance.abs() < near_band {
        Some(AlertStatus::Near)
    } else {
        Some(AlertStatus::Active)
    }
}

/// Service for alert evaluation and store-confirmed lifecycle transitions.
pub struct AlertService {
    store: Arc<dyn AlertStore>,
    near_band: Decimal,
}

impl AlertService {
    pub fn new(store: Arc<dyn AlertStore>) -> Self {
        Self {
            store,
            near_band: ALERT_NEAR_BAND_PERCENT,
        }
    }

    /// Override the proximity band. Mainly for tests.
    pub fn with_near_band(store: Arc<dyn AlertStore>, near_band: Decimal) -> Self {
        Self { store, near_band }
    }

    pub async fn get_alerts(&self, symbol: Option<&str>) -> Result<Vec<PriceAlert>> {
        self.store.get_alerts(symbol).await
    }

    pub async fn create_alert(&self, new_alert: &NewPriceAlert) -> Result<i64> {
        self.store.create_alert(new_alert).await
    }

    pub async fn update_alert(&self, alert_id: i64, update: &PriceAlertUpdate) -> Result<()> {
        self.store.update_alert(alert_id, update).await
    }

    /// Classify every enabled alert against the reconciled quotes.
    ///
    /// Alerts whose symbol has no reconciled quote are skipped for this
    /// pass; they keep whatever status the next pass gives them.
    pub fn evaluate(
        &self,
        alerts: &[PriceAlert],
        quotes: &HashMap<String, Arc<Quote>>,
    ) -> Vec<AlertEvaluation> {
        alerts
            .iter()
            .filter_map(|alert| {
                let quote = quotes.get(&alert.symbol)?;
                let status = classify(alert, quote.price, self.near_band)?;
                Some(AlertEvaluation {
                    alert_id: alert.id,
                    symbol: alert.symbol.clone(),
                    status,
                    distance_percent: distance_percent(
                        alert.direction,
                        alert.threshold_price,
                        quote.price,
                    ),
                })
            })
            .collect()
    }

    /// Persist newly triggered alerts from an evaluation pass.
    ///
    /// Idempotent: alerts already flagged triggered in the store are not
    /// marked again. Per-alert store failures are logged and skipped so one
    /// bad write cannot block the rest of the pass.
    pub async fn persist_triggers(
        &self,
        alerts: &[PriceAlert],
        evaluations: &[AlertEvaluation],
    ) -> Vec<i64> {
        let mut newly_triggered = Vec::new();
        for evaluation in evaluations {
            if evaluation.status != AlertStatus::Triggered {
                continue;
            }
            let already = alerts
                .iter()
                .find(|a| a.id == evaluation.alert_id)
                .map(|a| a.triggered)
                .unwrap_or(true);
            if already {
                continue;
            }
            match self.store.mark_triggered(evaluation.alert_id).await {
                Ok(()) => {
                    info!(
                        "alert {} triggered for {} (distance {}%)",
                        evaluation.alert_id, evaluation.symbol, evaluation.distance_percent
                    );
                    newly_triggered.push(evaluation.alert_id);
                }
                Err(err) => {
                    warn!(
                        "failed to persist trigger for alert {}: {}",
                        evaluation.alert_id, err
                    );
                }
            }
        }
        newly_triggered
    }

    /// Run the store's own evaluation pass against its latest persisted
    /// quotes. Returns the alerts the store newly marked triggered.
    pub async fn check(&self) -> Result<Vec<PriceAlert>> {
        self.store.check_alerts().await
    }

    /// Clear an alert's triggered flag. The only transition out of
    /// triggered; nothing auto-clears.
    pub async fn reset(&self, alert_id: i64) -> Result<()> {
        self.store.reset_alert(alert_id).await
    }

    pub async fn delete(&self, alert_id: i64) -> Result<()> {
        self.store.delete_alert(alert_id).await
    }
}
