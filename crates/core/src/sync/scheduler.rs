//! Cancellable recurring refresh tasks, one per data class.
//!
//! Quote/position refresh and alert evaluation run on independent cadences:
//! alert checks are cheap and frequent, full quote refreshes heavier and
//! session-gated. Each data class owns at most one recurring task;
//! scheduling a class again replaces its previous task. Cancellation is an
//! explicit handle release - dropping the scheduler aborts everything it
//! still owns.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use log::{debug, info};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::constants::{ALERT_REFRESH_INTERVAL, MARKET_DATA_REFRESH_INTERVAL};
use crate::utils::TradingSession;

/// The independently scheduled data classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataClass {
    /// Batched quote/position/series refresh.
    MarketData,
    /// Alert evaluation.
    Alerts,
}

impl DataClass {
    fn as_str(&self) -> &'static str {
        match self {
            DataClass::MarketData => "market-data",
            DataClass::Alerts => "alerts",
        }
    }
}

/// Cadence and gating for one data class.
#[derive(Clone)]
pub struct ScheduleConfig {
    pub interval: std::time::Duration,
    /// When set, ticks outside the session windows are skipped (the timer
    /// keeps running; only the work is gated).
    pub session: Option<Arc<TradingSession>>,
}

impl ScheduleConfig {
    pub fn every(interval: std::time::Duration) -> Self {
        Self {
            interval,
            session: None,
        }
    }

    pub fn gated(interval: std::time::Duration, session: TradingSession) -> Self {
        Self {
            interval,
            session: Some(Arc::new(session)),
        }
    }

    /// Stock cadence for the quote/position refresh: session-gated.
    pub fn market_data() -> Self {
        Self::gated(MARKET_DATA_REFRESH_INTERVAL, TradingSession::default())
    }

    /// Stock cadence for alert evaluation: tighter, around the clock.
    pub fn alerts() -> Self {
        Self::every(ALERT_REFRESH_INTERVAL)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::market_data()
    }
}

/// Owner of the recurring refresh tasks.
pub struct RefreshScheduler {
    tasks: Mutex<HashMap<DataClass, JoinHandle<()>>>,
}

impl RefreshScheduler {
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Start (or restart) the recurring task for a data class.
    ///
    /// `tick` runs to completion before the next interval is awaited, so a
    /// slow cycle delays its own successor rather than overlapping with it;
    /// there is never more than one outstanding cycle per data class.
    pub fn schedule<F, Fut>(&self, class: DataClass, config: ScheduleConfig, tick: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(config.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if let Some(session) = &config.session {
                    if !session.is_open_now() {
                        debug!("{} refresh skipped: session closed", class.as_str());
                        continue;
                    }
                }
                tick().await;
            }
        });

        if let Some(previous) = self.tasks.lock().unwrap().insert(class, handle) {
            previous.abort();
        }
        info!("scheduled {} refresh", class.as_str());
    }

    /// Stop the recurring task for one data class.
    pub fn cancel(&self, class: DataClass) {
        if let Some(handle) = self.tasks.lock().unwrap().remove(&class) {
            handle.abort();
            info!("cancelled {} refresh", class.as_str());
        }
    }

    /// Stop everything.
    pub fn shutdown(&self) {
        let mut tasks = self.tasks.lock().unwrap();
        for (_, handle) in tasks.drain() {
            handle.abort();
        }
    }
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
