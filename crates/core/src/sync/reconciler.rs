//! Incremental, identity-preserving reconciliation.
//!
//! Each refresh cycle produces a freshly fetched collection per data class.
//! Handing that collection straight to consumers would churn every entry
//! every cycle, forcing downstream work (re-rendering, re-sorting, alert
//! re-evaluation) for entities that did not observably change. The merge
//! here folds fetched state into the previous snapshot while keeping the
//! previous `Arc` for every entry whose observable fields are unchanged, so
//! consumers can detect "nothing to do" with two pointer comparisons:
//!
//! - entry level: `Arc::ptr_eq(&prev[k], &next[k])`
//! - collection level: a merge with zero changes returns the previous map
//!   `Arc` itself
//!
//! Entries are never aliased outside the merge boundary; the snapshots are
//! owned by one logical session and replaced wholesale by the refresh task.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use crate::portfolio::Position;
use crate::quotes::{PricePoint, Quote, SymbolData};

/// A reconciled snapshot: shared map of shared entries.
pub type SharedMap<K, V> = Arc<HashMap<K, Arc<V>>>;

/// Policy for keys present in the previous snapshot but absent from the
/// fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsentPolicy {
    /// Keep the previous entry. Right for partial fetches (quotes, series):
    /// a symbol missing from one batch is stale, not deleted. Deletion is
    /// the persistence collaborator's call, never inferred here.
    Keep,
    /// Drop the entry. Right when the fetch is a freshly loaded full set
    /// (positions): absence means the entity is gone.
    Drop,
}

/// How to treat entries present on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Field-compare and retain the previous entry when unchanged.
    Diff,
    /// Adopt every fetched entry without comparing. Used for user-forced
    /// refreshes, where "give me fresh data" must be visible even when the
    /// values happen to match.
    Replace,
}

/// Counters describing what a merge did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub retained: usize,
    pub replaced: usize,
    pub added: usize,
    pub removed: usize,
}

impl MergeStats {
    /// True when the merge changed nothing observable.
    pub fn is_noop(&self) -> bool {
        self.replaced == 0 && self.added == 0 && self.removed == 0
    }
}

/// Merge a fetched collection into the previous snapshot.
///
/// `equals` compares only the observable fields relevant to the consumer.
/// When the merge is a no-op the returned map is the `previous` `Arc`
/// itself, so reference-equality change detection short-circuits at the
/// collection level too.
pub fn merge<K, V, F>(
    previous: &SharedMap<K, V>,
    fetched: HashMap<K, V>,
    equals: F,
    absent: AbsentPolicy,
    mode: MergeMode,
) -> (SharedMap<K, V>, MergeStats)
where
    K: Eq + Hash + Clone,
    F: Fn(&V, &V) -> bool,
{
    let mut stats = MergeStats::default();
    let mut next: HashMap<K, Arc<V>> = HashMap::with_capacity(previous.len() + fetched.len());

    for (key, value) in fetched {
        match previous.get(&key) {
            Some(prev) if mode == MergeMode::Diff && equals(prev, &value) => {
                stats.retained += 1;
                next.insert(key, Arc::clone(prev));
            }
            Some(_) => {
                stats.replaced += 1;
                next.insert(key, Arc::new(value));
            }
            None => {
                stats.added += 1;
                next.insert(key, Arc::new(value));
            }
        }
    }

    for (key, prev) in previous.iter() {
        if next.contains_key(key) {
            continue;
        }
        match absent {
            AbsentPolicy::Keep => {
                next.insert(key.clone(), Arc::clone(prev));
            }
            AbsentPolicy::Drop => {
                stats.removed += 1;
            }
        }
    }

    if stats.is_noop() {
        (Arc::clone(previous), stats)
    } else {
        (Arc::new(next), stats)
    }
}

/// Observable equality for quote snapshots: the fields a list row renders.
pub fn quotes_equal(a: &Quote, b: &Quote) -> bool {
    a.price == b.price
        && a.change == b.change
        && a.change_percent == b.change_percent
        && a.volume == b.volume
}

/// Observable equality for positions: stored fields plus the resolved
/// price; the rest of the valuation quadruple is derived from these.
pub fn positions_equal(a: &Position, b: &Position) -> bool {
    a.observably_equal(b)
}

/// Coarse equality for intraday series.
///
/// Intraday series grow by appending, so a point-by-point comparison is
/// wasted work. Two series count as unchanged when their final points agree
/// on timestamp and close and their lengths differ by at most one; a larger
/// length jump is a discontinuity and forces replacement.
pub fn series_equal(a: &[PricePoint], b: &[PricePoint]) -> bool {
    let len_delta = a.len().abs_diff(b.len());
    if len_delta > 1 {
        return false;
    }
    match (a.last(), b.last()) {
        (None, None) => true,
        (Some(last_a), Some(last_b)) => {
            last_a.timestamp == last_b.timestamp && last_a.close == last_b.close
        }
        _ => false,
    }
}

/// The symbols a batch fetch came back empty for.
///
/// These are routed to sequential per-symbol retries by the refresh cycle.
pub fn missing_symbols(requested: &[String], fetched: &HashMap<String, SymbolData>) -> Vec<String> {
    requested
        .iter()
        .filter(|symbol| fetched.get(*symbol).map_or(true, SymbolData::is_empty))
        .cloned()
        .collect()
}
