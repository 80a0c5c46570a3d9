//! Synchronization: incremental reconciliation of fetched market state and
//! the refresh machinery that drives it.
//!
//! - [`reconciler`] - Identity-preserving merge of fetched collections into
//!   the previous in-memory snapshots
//! - [`scheduler`] - Cancellable recurring tasks per data class, gated on
//!   trading session windows
//! - [`refresh_service`] - The full refresh cycle: fetch, resolve, value,
//!   reconcile, evaluate alerts

pub mod reconciler;
pub mod refresh_service;
pub mod scheduler;

#[cfg(test)]
mod reconciler_tests;
#[cfg(test)]
mod refresh_service_tests;

pub use reconciler::{
    merge, missing_symbols, positions_equal, quotes_equal, series_equal, AbsentPolicy, MergeMode,
    MergeStats, SharedMap,
};
pub use refresh_service::{RefreshService, TrackerState};
pub use scheduler::{DataClass, RefreshScheduler, ScheduleConfig};
