//! End-to-end tests for the refresh cycle against mock collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Notify;

use tickertrack_market_data::{
    MarketDataClient, MarketDataError, MarketDataProvider, PricePoint, Quote,
};

use crate::alerts::{
    AlertDirection, AlertService, AlertStatus, AlertStore, NewPriceAlert, PriceAlert,
    PriceAlertUpdate,
};
use crate::errors::Result;
use crate::portfolio::{
    CapitalTransfer, NewCapitalTransfer, NewPosition, NewTransaction, PortfolioService,
    PortfolioStore, PositionRecord, PositionUpdate, Transaction, TransactionUpdate,
};
use crate::quotes::PriceSource;
use crate::watchlist::{Instrument, WatchlistService, WatchlistStore};

use super::refresh_service::RefreshService;

// =========================================================================
// Mock provider
// =========================================================================

/// Per-symbol prices; symbols not listed are permanently dark. The next
/// quote fetch can be parked behind a gate to stage overlapping cycles.
struct ScriptedProvider {
    prices: Mutex<HashMap<String, Decimal>>,
    quote_calls: AtomicUsize,
    park_next_quote: AtomicBool,
    parked: AtomicBool,
    gate: Notify,
}

impl ScriptedProvider {
    fn new(prices: &[(&str, Decimal)]) -> Self {
        Self {
            prices: Mutex::new(
                prices
                    .iter()
                    .map(|(s, p)| (s.to_string(), *p))
                    .collect(),
            ),
            quote_calls: AtomicUsize::new(0),
            park_next_quote: AtomicBool::new(false),
            parked: AtomicBool::new(false),
            gate: Notify::new(),
        }
    }

    fn set_price(&self, symbol: &str, price: Decimal) {
        self.prices
            .lock()
            .unwrap()
            .insert(symbol.to_string(), price);
    }

    fn park_next_quote(&self) {
        self.park_next_quote.store(true, Ordering::SeqCst);
    }

    fn is_parked(&self) -> bool {
        self.parked.load(Ordering::SeqCst)
    }

    fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl MarketDataProvider for ScriptedProvider {
    fn id(&self) -> &'static str {
        "SCRIPTED"
    }

    async fn fetch_quote(&self, symbol: &str) -> std::result::Result<Quote, MarketDataError> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        // Snapshot the price before parking so a staged slow fetch serves
        // the value from when it started, not from when it was released.
        let price = self
            .prices
            .lock()
            .unwrap()
            .get(symbol)
            .copied()
            .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))?;
        if self.park_next_quote.swap(false, Ordering::SeqCst) {
            self.parked.store(true, Ordering::SeqCst);
            self.gate.notified().await;
            self.parked.store(false, Ordering::SeqCst);
        }
        Ok(Quote {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            price,
            change: Decimal::ZERO,
            change_percent: Decimal::ZERO,
            volume: 1000,
            high: price,
            low: price,
            open: price,
            previous_close: price,
            market_cap: None,
            pe_ratio: None,
            turnover: None,
        })
    }

    async fn fetch_intraday(
        &self,
        symbol: &str,
    ) -> std::result::Result<Vec<PricePoint>, MarketDataError> {
        let price = self
            .prices
            .lock()
            .unwrap()
            .get(symbol)
            .copied()
            .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))?;
        Ok(vec![PricePoint {
            timestamp: Utc.with_ymd_and_hms(2024, 6, 3, 10, 30, 0).unwrap(),
            open: price,
            high: price,
            low: price,
            close: price,
            volume: 1000,
        }])
    }
}

// =========================================================================
// Mock stores
// =========================================================================

#[derive(Default)]
struct MockPortfolioStore {
    positions: Arc<Mutex<Vec<PositionRecord>>>,
}

#[async_trait]
impl PortfolioStore for MockPortfolioStore {
    async fn get_positions(&self) -> Result<Vec<PositionRecord>> {
        Ok(self.positions.lock().unwrap().clone())
    }

    async fn add_position(&self, _new_position: &NewPosition) -> Result<i64> {
        Ok(1)
    }

    async fn update_position(&self, _update: &PositionUpdate) -> Result<()> {
        Ok(())
    }

    async fn delete_position(&self, _position_id: i64) -> Result<()> {
        Ok(())
    }

    async fn get_transactions(&self, _symbol: Option<&str>) -> Result<Vec<Transaction>> {
        Ok(Vec::new())
    }

    async fn add_transaction(&self, _new_transaction: &NewTransaction) -> Result<i64> {
        Ok(1)
    }

    async fn update_transaction(&self, _update: &TransactionUpdate) -> Result<()> {
        Ok(())
    }

    async fn delete_transaction(&self, _transaction_id: i64) -> Result<()> {
        Ok(())
    }

    async fn get_capital_transfers(&self) -> Result<Vec<CapitalTransfer>> {
        Ok(Vec::new())
    }

    async fn add_capital_transfer(&self, _new_transfer: &NewCapitalTransfer) -> Result<i64> {
        Ok(1)
    }

    async fn delete_capital_transfer(&self, _transfer_id: i64) -> Result<()> {
        Ok(())
    }

    async fn get_initial_balance(&self) -> Result<Decimal> {
        Ok(Decimal::ZERO)
    }

    async fn set_initial_balance(&self, _balance: Decimal) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct MockAlertStore {
    alerts: Arc<Mutex<Vec<PriceAlert>>>,
}

#[async_trait]
impl AlertStore for MockAlertStore {
    async fn get_alerts(&self, _symbol: Option<&str>) -> Result<Vec<PriceAlert>> {
        Ok(self.alerts.lock().unwrap().clone())
    }

    async fn create_alert(&self, _new_alert: &NewPriceAlert) -> Result<i64> {
        Ok(1)
    }

    async fn update_alert(&self, _alert_id: i64, _update: &PriceAlertUpdate) -> Result<()> {
        Ok(())
    }

    async fn check_alerts(&self) -> Result<Vec<PriceAlert>> {
        Ok(Vec::new())
    }

    async fn mark_triggered(&self, alert_id: i64) -> Result<()> {
        let mut alerts = self.alerts.lock().unwrap();
        for alert in alerts.iter_mut() {
            if alert.id == alert_id {
                alert.triggered = true;
            }
        }
        Ok(())
    }

    async fn reset_alert(&self, alert_id: i64) -> Result<()> {
        let mut alerts = self.alerts.lock().unwrap();
        for alert in alerts.iter_mut() {
            if alert.id == alert_id {
                alert.triggered = false;
            }
        }
        Ok(())
    }

    async fn delete_alert(&self, alert_id: i64) -> Result<()> {
        self.alerts.lock().unwrap().retain(|a| a.id != alert_id);
        Ok(())
    }
}

#[derive(Default)]
struct MockWatchlistStore {
    favorites: Arc<Mutex<Vec<Instrument>>>,
}

#[async_trait]
impl WatchlistStore for MockWatchlistStore {
    async fn get_favorites(&self) -> Result<Vec<Instrument>> {
        Ok(self.favorites.lock().unwrap().clone())
    }

    async fn search_instruments(&self, _query: &str) -> Result<Vec<Instrument>> {
        Ok(Vec::new())
    }

    async fn add_to_group(&self, _symbol: &str, _group: Option<&str>) -> Result<()> {
        Ok(())
    }

    async fn remove(&self, _symbol: &str) -> Result<()> {
        Ok(())
    }

    async fn get_custom_names(&self) -> Result<HashMap<String, String>> {
        Ok(HashMap::new())
    }

    async fn set_custom_name(&self, _symbol: &str, _name: &str) -> Result<()> {
        Ok(())
    }
}

// =========================================================================
// Fixture
// =========================================================================

struct Fixture {
    provider: Arc<ScriptedProvider>,
    portfolio_store: Arc<MockPortfolioStore>,
    alert_store: Arc<MockAlertStore>,
    service: Arc<RefreshService>,
}

fn record(id: i64, symbol: &str, quantity: Decimal, avg_cost: Decimal) -> PositionRecord {
    PositionRecord {
        id,
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        quantity,
        avg_cost,
        current_price: None,
    }
}

fn fixture(prices: &[(&str, Decimal)], positions: Vec<PositionRecord>) -> Fixture {
    let provider = Arc::new(ScriptedProvider::new(prices));
    // Zero TTL so every cycle consults the provider, like a fresh session.
    let client = Arc::new(MarketDataClient::with_ttls(
        provider.clone(),
        Duration::from_secs(0),
        Duration::from_secs(0),
    ));

    let portfolio_store = Arc::new(MockPortfolioStore {
        positions: Arc::new(Mutex::new(positions)),
    });
    let alert_store = Arc::new(MockAlertStore::default());
    let watchlist_store = Arc::new(MockWatchlistStore::default());

    let service = Arc::new(RefreshService::new(
        client.clone(),
        Arc::new(PortfolioService::new(portfolio_store.clone())),
        Arc::new(AlertService::new(alert_store.clone())),
        Arc::new(WatchlistService::new(watchlist_store, client)),
    ));

    Fixture {
        provider,
        portfolio_store,
        alert_store,
        service,
    }
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn cycle_values_positions_from_live_quotes() {
    let fx = fixture(
        &[("600519", dec!(12))],
        vec![record(1, "600519", dec!(100), dec!(10))],
    );

    fx.service.refresh_market_data(false).await.unwrap();
    let state = fx.service.state().await;

    let position = &state.positions["600519"];
    assert_eq!(position.current_price, dec!(12));
    assert_eq!(position.market_value, dec!(1200));
    assert_eq!(position.profit, dec!(200));
    assert_eq!(position.profit_percent, dec!(20));
    assert_eq!(state.summary.total_market_value, dec!(1200));
}

#[tokio::test]
async fn dark_symbol_is_retried_once_then_falls_back_to_avg_cost() {
    // A and B served; C permanently dark.
    let fx = fixture(
        &[("AAA", dec!(12)), ("BBB", dec!(20))],
        vec![
            record(1, "AAA", dec!(100), dec!(10)),
            record(2, "BBB", dec!(10), dec!(18)),
            record(3, "CCC", dec!(50), dec!(5)),
        ],
    );

    fx.service.refresh_market_data(false).await.unwrap();
    let state = fx.service.state().await;

    // C fell back to its cost basis rather than corrupting the cycle.
    let degraded = &state.positions["CCC"];
    assert_eq!(degraded.current_price, dec!(5));
    assert_eq!(degraded.price_source, PriceSource::CostBasis);
    assert_eq!(degraded.profit, Decimal::ZERO);
    assert!(!degraded.price_unavailable);

    // The others are untouched by C's failure.
    assert_eq!(state.positions["AAA"].current_price, dec!(12));
    assert_eq!(state.positions["BBB"].current_price, dec!(20));

    // Batch attempt plus exactly one individual retry for the dark symbol.
    let calls = fx.provider.quote_calls.load(Ordering::SeqCst);
    assert_eq!(calls, 4);
}

#[tokio::test]
async fn retry_recovers_a_symbol_that_comes_back() {
    let fx = fixture(&[], vec![record(1, "AAA", dec!(10), dec!(10))]);

    // Dark on the first cycle, alive on the second.
    fx.service.refresh_market_data(false).await.unwrap();
    assert_eq!(
        fx.service.state().await.positions["AAA"].price_source,
        PriceSource::CostBasis
    );

    fx.provider.set_price("AAA", dec!(11));
    fx.service.refresh_market_data(false).await.unwrap();
    let state = fx.service.state().await;
    assert_eq!(state.positions["AAA"].price_source, PriceSource::Live);
    assert_eq!(state.positions["AAA"].current_price, dec!(11));
}

#[tokio::test]
async fn unchanged_cycles_preserve_snapshot_identity() {
    let fx = fixture(
        &[("600519", dec!(12))],
        vec![record(1, "600519", dec!(100), dec!(10))],
    );

    fx.service.refresh_market_data(false).await.unwrap();
    let first = fx.service.state().await;

    fx.service.refresh_market_data(false).await.unwrap();
    let second = fx.service.state().await;

    // Nothing observable moved, so both snapshots are the same maps.
    assert!(Arc::ptr_eq(&first.quotes, &second.quotes));
    assert!(Arc::ptr_eq(&first.positions, &second.positions));
    assert!(Arc::ptr_eq(
        &first.positions["600519"],
        &second.positions["600519"]
    ));
}

#[tokio::test]
async fn price_move_replaces_only_the_moved_entries() {
    let fx = fixture(
        &[("AAA", dec!(12)), ("BBB", dec!(20))],
        vec![
            record(1, "AAA", dec!(100), dec!(10)),
            record(2, "BBB", dec!(10), dec!(18)),
        ],
    );

    fx.service.refresh_market_data(false).await.unwrap();
    let first = fx.service.state().await;

    fx.provider.set_price("BBB", dec!(21));
    fx.service.refresh_market_data(false).await.unwrap();
    let second = fx.service.state().await;

    assert!(Arc::ptr_eq(&first.positions["AAA"], &second.positions["AAA"]));
    assert!(!Arc::ptr_eq(&first.positions["BBB"], &second.positions["BBB"]));
    assert_eq!(second.positions["BBB"].current_price, dec!(21));
}

#[tokio::test]
async fn force_refresh_replaces_entries_even_when_values_match() {
    let fx = fixture(
        &[("600519", dec!(12))],
        vec![record(1, "600519", dec!(100), dec!(10))],
    );

    fx.service.refresh_market_data(false).await.unwrap();
    let first = fx.service.state().await;

    fx.service.force_refresh(None).await.unwrap();
    let second = fx.service.state().await;

    assert!(!Arc::ptr_eq(&first.quotes, &second.quotes));
    assert!(!Arc::ptr_eq(
        &first.quotes["600519"],
        &second.quotes["600519"]
    ));
}

#[tokio::test]
async fn superseded_cycle_results_are_discarded() {
    let fx = fixture(
        &[("600519", dec!(10))],
        vec![record(1, "600519", dec!(100), dec!(10))],
    );

    // Park the first cycle inside its quote fetch so it still carries the
    // old price when it eventually finishes.
    fx.provider.park_next_quote();
    let service = fx.service.clone();
    let straggler = tokio::spawn(async move { service.refresh_market_data(false).await });
    while !fx.provider.is_parked() {
        tokio::task::yield_now().await;
    }

    // A younger cycle completes with a fresher price while the first one is
    // still in flight.
    fx.provider.set_price("600519", dec!(11));
    fx.service.refresh_market_data(false).await.unwrap();
    let fresh = fx.service.state().await;
    assert_eq!(fresh.positions["600519"].current_price, dec!(11));

    // The straggler finishes afterwards with its stale fetch; it must not
    // clobber the fresher snapshot.
    fx.provider.release();
    straggler.await.unwrap().unwrap();

    let after = fx.service.state().await;
    assert!(Arc::ptr_eq(&fresh.quotes, &after.quotes));
    assert!(Arc::ptr_eq(&fresh.positions, &after.positions));
    assert_eq!(after.positions["600519"].current_price, dec!(11));
}

#[tokio::test]
async fn deleted_position_disappears_after_reload() {
    let fx = fixture(
        &[("AAA", dec!(12)), ("BBB", dec!(20))],
        vec![
            record(1, "AAA", dec!(100), dec!(10)),
            record(2, "BBB", dec!(10), dec!(18)),
        ],
    );

    fx.service.refresh_market_data(false).await.unwrap();
    assert_eq!(fx.service.state().await.positions.len(), 2);

    fx.portfolio_store
        .positions
        .lock()
        .unwrap()
        .retain(|r| r.symbol != "BBB");
    fx.service.refresh_market_data(false).await.unwrap();

    let state = fx.service.state().await;
    assert_eq!(state.positions.len(), 1);
    assert!(!state.positions.contains_key("BBB"));
    // The quote snapshot keeps the symbol; deletion is the store's call.
    assert!(state.quotes.contains_key("BBB"));
}

#[tokio::test]
async fn alert_cycle_marks_crossed_thresholds_against_reconciled_quotes() {
    let fx = fixture(
        &[("600519", dec!(101))],
        vec![record(1, "600519", dec!(100), dec!(90))],
    );
    fx.alert_store.alerts.lock().unwrap().push(PriceAlert {
        id: 7,
        symbol: "600519".to_string(),
        threshold_price: dec!(100),
        direction: AlertDirection::Above,
        enabled: true,
        triggered: false,
    });

    fx.service.refresh_market_data(false).await.unwrap();
    let newly = fx.service.refresh_alerts().await.unwrap();
    assert_eq!(newly, vec![7]);

    let state = fx.service.state().await;
    assert_eq!(state.alert_evaluations.len(), 1);
    assert_eq!(state.alert_evaluations[0].status, AlertStatus::Triggered);
    assert!(fx.alert_store.alerts.lock().unwrap()[0].triggered);

    // Re-running the alert cycle does not re-mark.
    let newly = fx.service.refresh_alerts().await.unwrap();
    assert!(newly.is_empty());
}
