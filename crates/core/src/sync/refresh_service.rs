//! The refresh cycle: fetch, resolve, value, reconcile, evaluate.
//!
//! One service owns the reconciled view of the session - quotes, positions,
//! intraday series, portfolio totals, and alert classifications - and
//! rebuilds it from the collaborators on each tick. The data path per
//! market-data cycle:
//!
//! 1. Load stored positions and favorites (persistence collaborator)
//! 2. One batch fetch for the combined symbol universe (market data client)
//! 3. Sequential single-symbol retries for symbols the batch missed
//! 4. Resolve one price per position, recompute the valuation quadruple
//! 5. Merge everything into the previous snapshots, preserving identity of
//!    unchanged entries
//! 6. Recompute portfolio totals from the reconciled positions
//!
//! Alert evaluation runs on its own cadence against the reconciled quotes
//! and persists newly crossed thresholds.
//!
//! Overlapping cycles are resolved by a monotonic cycle number: a cycle
//! that finishes after a younger sibling has already applied is discarded
//! instead of clobbering fresher data. Collaborator failures abort the
//! cycle and leave the previous snapshots untouched - the worst failure
//! mode is stale displayed data.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::RwLock;

use tickertrack_market_data::MarketDataClient;

use crate::alerts::{AlertEvaluation, AlertService};
use crate::constants::MISSING_SYMBOL_RETRY_LIMIT;
use crate::errors::Result;
use crate::portfolio::{valuation::value_record, PortfolioService, PortfolioSummary, Position};
use crate::quotes::{PricePoint, Quote};
use crate::watchlist::WatchlistService;

use super::reconciler::{
    merge, missing_symbols, positions_equal, quotes_equal, series_equal, AbsentPolicy, MergeMode,
    SharedMap,
};
use super::scheduler::{DataClass, RefreshScheduler, ScheduleConfig};

/// The reconciled view of one tracking session.
///
/// Every field is an `Arc` snapshot: consumers clone the handle, compare
/// pointers against what they rendered last, and skip work when nothing
/// changed. Snapshots are only ever replaced wholesale by the refresh
/// tasks, never mutated in place.
#[derive(Clone)]
pub struct TrackerState {
    pub quotes: SharedMap<String, Quote>,
    pub positions: SharedMap<String, Position>,
    pub series: SharedMap<String, Vec<PricePoint>>,
    pub summary: Arc<PortfolioSummary>,
    pub alert_evaluations: Arc<Vec<AlertEvaluation>>,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            quotes: Arc::new(HashMap::new()),
            positions: Arc::new(HashMap::new()),
            series: Arc::new(HashMap::new()),
            summary: Arc::new(PortfolioSummary::default()),
            alert_evaluations: Arc::new(Vec::new()),
        }
    }
}

/// Orchestrates the periodic refresh cycles and owns the tracker state.
pub struct RefreshService {
    client: Arc<MarketDataClient>,
    portfolio: Arc<PortfolioService>,
    alerts: Arc<AlertService>,
    watchlist: Arc<WatchlistService>,
    state: RwLock<TrackerState>,
    issued_cycles: AtomicU64,
    applied_cycle: AtomicU64,
}

impl RefreshService {
    pub fn new(
        client: Arc<MarketDataClient>,
        portfolio: Arc<PortfolioService>,
        alerts: Arc<AlertService>,
        watchlist: Arc<WatchlistService>,
    ) -> Self {
        Self {
            client,
            portfolio,
            alerts,
            watchlist,
            state: RwLock::new(TrackerState::default()),
            issued_cycles: AtomicU64::new(0),
            applied_cycle: AtomicU64::new(0),
        }
    }

    /// A cheap snapshot of the current reconciled view.
    pub async fn state(&self) -> TrackerState {
        self.state.read().await.clone()
    }

    /// Run one full market-data cycle.
    ///
    /// With `force`, the client cache is bypassed and the merge adopts
    /// every fetched entry without comparing - the user asked for fresh
    /// data, so they get fresh entries.
    pub async fn refresh_market_data(&self, force: bool) -> Result<()> {
        let cycle = self.issued_cycles.fetch_add(1, Ordering::SeqCst) + 1;

        let records = self.portfolio.load_positions().await?;
        let favorites = self.watchlist.get_favorites().await?;

        let symbols: Vec<String> = records
            .iter()
            .map(|record| record.symbol.clone())
            .chain(favorites.iter().map(|instrument| instrument.symbol.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut batch = self.client.get_batch_symbol_data(&symbols, force).await;

        // Sequential per-symbol retries, best-effort. Sequential on
        // purpose: a burst of dark symbols must not burst the source.
        for symbol in missing_symbols(&symbols, &batch) {
            let mut recovered = false;
            for _ in 0..MISSING_SYMBOL_RETRY_LIMIT {
                let data = self.client.get_symbol_data(&symbol, false).await;
                if !data.is_empty() {
                    debug!("individual retry recovered data for {}", symbol);
                    batch.insert(symbol.clone(), data);
                    recovered = true;
                    break;
                }
            }
            if !recovered {
                warn!("no data for {} after individual retries", symbol);
            }
        }

        let mut fetched_positions: HashMap<String, Position> =
            HashMap::with_capacity(records.len());
        for record in &records {
            let fetched = batch.get(&record.symbol).cloned().unwrap_or_default();
            fetched_positions.insert(record.symbol.clone(), value_record(record, &fetched));
        }

        let mut fetched_quotes: HashMap<String, Quote> = HashMap::new();
        let mut fetched_series: HashMap<String, Vec<PricePoint>> = HashMap::new();
        for (symbol, data) in batch {
            if let Some(quote) = data.quote {
                fetched_quotes.insert(symbol.clone(), quote);
            }
            if let Some(series) = data.intraday {
                fetched_series.insert(symbol, series);
            }
        }

        let transactions = self.portfolio.get_transactions(None).await?;
        let transfers = self.portfolio.get_capital_transfers().await?;
        let initial_balance = self.portfolio.get_initial_balance().await?;

        let mode = if force {
            MergeMode::Replace
        } else {
            MergeMode::Diff
        };

        let mut state = self.state.write().await;
        if cycle <= self.applied_cycle.load(Ordering::SeqCst) {
            debug!("discarding results of superseded refresh cycle {}", cycle);
            return Ok(());
        }

        let (quotes, quote_stats) = merge(
            &state.quotes,
            fetched_quotes,
            quotes_equal,
            AbsentPolicy::Keep,
            mode,
        );
        let (positions, position_stats) = merge(
            &state.positions,
            fetched_positions,
            positions_equal,
            AbsentPolicy::Drop,
            mode,
        );
        let (series, series_stats) = merge(
            &state.series,
            fetched_series,
            |a, b| series_equal(a, b),
            AbsentPolicy::Keep,
            mode,
        );

        let position_list: Vec<Position> = positions
            .values()
            .map(|position| (**position).clone())
            .collect();
        let summary = PortfolioService::summarize(
            &position_list,
            &transactions,
            &transfers,
            initial_balance,
        );

        state.quotes = quotes;
        state.positions = positions;
        state.series = series;
        state.summary = Arc::new(summary);
        self.applied_cycle.store(cycle, Ordering::SeqCst);

        debug!(
            "cycle {} applied: quotes {:?}, positions {:?}, series {:?}",
            cycle, quote_stats, position_stats, series_stats
        );
        Ok(())
    }

    /// Run one alert cycle against the reconciled quotes.
    ///
    /// Returns the ids of alerts newly marked triggered this pass (local
    /// evaluation; the store's own pass is logged but its triggers surface
    /// through the next `get_alerts`).
    pub async fn refresh_alerts(&self) -> Result<Vec<i64>> {
        let alerts = self.alerts.get_alerts(None).await?;

        let quotes = self.state.read().await.quotes.clone();
        let evaluations = self.alerts.evaluate(&alerts, &quotes);
        let newly_triggered = self.alerts.persist_triggers(&alerts, &evaluations).await;

        // Server-side pass over the store's persisted quotes; best-effort.
        match self.alerts.check().await {
            Ok(server_triggered) => {
                for alert in &server_triggered {
                    info!(
                        "store-side check triggered alert {} for {}",
                        alert.id, alert.symbol
                    );
                }
            }
            Err(err) => warn!("store-side alert check failed: {}", err),
        }

        self.state.write().await.alert_evaluations = Arc::new(evaluations);
        Ok(newly_triggered)
    }

    /// User-requested refresh: invalidate caches and refetch regardless of
    /// freshness, replacing reconciled entries unconditionally.
    pub async fn force_refresh(&self, symbols: Option<&[String]>) -> Result<()> {
        match symbols {
            Some(list) => {
                for symbol in list {
                    self.client.clear_cache(symbol);
                }
            }
            None => self.client.clear_all(),
        }
        self.refresh_market_data(true).await
    }

    /// Wire the periodic cycles onto a scheduler.
    ///
    /// The scheduled tasks hold only a weak handle: once the owning session
    /// drops the service, in-flight ticks fizzle instead of resurrecting it.
    pub fn start(
        self: &Arc<Self>,
        scheduler: &RefreshScheduler,
        market_data: ScheduleConfig,
        alerts: ScheduleConfig,
    ) {
        let weak = Arc::downgrade(self);
        scheduler.schedule(DataClass::MarketData, market_data, move || {
            let weak = weak.clone();
            async move {
                let Some(service) = weak.upgrade() else {
                    return;
                };
                if let Err(err) = service.refresh_market_data(false).await {
                    warn!("market data refresh failed, keeping previous state: {}", err);
                }
            }
        });

        let weak = Arc::downgrade(self);
        scheduler.schedule(DataClass::Alerts, alerts, move || {
            let weak = weak.clone();
            async move {
                let Some(service) = weak.upgrade() else {
                    return;
                };
                if let Err(err) = service.refresh_alerts().await {
                    warn!("alert refresh failed: {}", err);
                }
            }
        });
    }
}
