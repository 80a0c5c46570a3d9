//! Tests for the identity-preserving merge.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::quotes::{PricePoint, Quote, SymbolData};

use super::reconciler::{
    merge, missing_symbols, quotes_equal, series_equal, AbsentPolicy, MergeMode, SharedMap,
};

fn quote(symbol: &str, price: Decimal, volume: i64) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        price,
        change: Decimal::ZERO,
        change_percent: Decimal::ZERO,
        volume,
        high: price,
        low: price,
        open: price,
        previous_close: price,
        market_cap: None,
        pe_ratio: None,
        turnover: None,
    }
}

fn snapshot(quotes: Vec<Quote>) -> SharedMap<String, Quote> {
    Arc::new(
        quotes
            .into_iter()
            .map(|q| (q.symbol.clone(), Arc::new(q)))
            .collect(),
    )
}

fn fetched(quotes: Vec<Quote>) -> HashMap<String, Quote> {
    quotes.into_iter().map(|q| (q.symbol.clone(), q)).collect()
}

fn ts(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 10, minute, 0).unwrap()
}

fn bar(minute: u32, close: Decimal) -> PricePoint {
    PricePoint {
        timestamp: ts(minute),
        open: close,
        high: close,
        low: close,
        close,
        volume: 100,
    }
}

// =========================================================================
// Identity preservation
// =========================================================================

#[test]
fn merging_identical_data_returns_the_previous_map_itself() {
    let previous = snapshot(vec![quote("600519", dec!(10), 100)]);
    let (next, stats) = merge(
        &previous,
        fetched(vec![quote("600519", dec!(10), 100)]),
        quotes_equal,
        AbsentPolicy::Keep,
        MergeMode::Diff,
    );
    assert!(stats.is_noop());
    assert!(Arc::ptr_eq(&previous, &next));
}

#[test]
fn unchanged_entries_keep_their_identity_when_others_change() {
    let previous = snapshot(vec![
        quote("600519", dec!(10), 100),
        quote("000858", dec!(20), 200),
    ]);
    let (next, stats) = merge(
        &previous,
        fetched(vec![
            quote("600519", dec!(10), 100),
            quote("000858", dec!(21), 250),
        ]),
        quotes_equal,
        AbsentPolicy::Keep,
        MergeMode::Diff,
    );

    assert_eq!(stats.retained, 1);
    assert_eq!(stats.replaced, 1);
    assert!(!Arc::ptr_eq(&previous, &next));
    assert!(Arc::ptr_eq(&previous["600519"], &next["600519"]));
    assert!(!Arc::ptr_eq(&previous["000858"], &next["000858"]));
    assert_eq!(next["000858"].price, dec!(21));
}

#[test]
fn fetch_order_and_equal_floats_cause_no_spurious_replacement() {
    let previous = snapshot(vec![
        quote("600519", dec!(10.50), 100),
        quote("000858", dec!(20.25), 200),
        quote("300750", dec!(30.75), 300),
    ]);
    // Same values, different insertion order.
    let (next, stats) = merge(
        &previous,
        fetched(vec![
            quote("300750", dec!(30.75), 300),
            quote("600519", dec!(10.50), 100),
            quote("000858", dec!(20.25), 200),
        ]),
        quotes_equal,
        AbsentPolicy::Keep,
        MergeMode::Diff,
    );
    assert!(stats.is_noop());
    assert!(Arc::ptr_eq(&previous, &next));
}

// =========================================================================
// Insertion and absence policies
// =========================================================================

#[test]
fn new_entries_are_inserted() {
    let previous = snapshot(vec![quote("600519", dec!(10), 100)]);
    let (next, stats) = merge(
        &previous,
        fetched(vec![
            quote("600519", dec!(10), 100),
            quote("000858", dec!(20), 200),
        ]),
        quotes_equal,
        AbsentPolicy::Keep,
        MergeMode::Diff,
    );
    assert_eq!(stats.added, 1);
    assert_eq!(next.len(), 2);
}

#[test]
fn keep_policy_retains_entries_missing_from_the_fetch() {
    let previous = snapshot(vec![
        quote("600519", dec!(10), 100),
        quote("000858", dec!(20), 200),
    ]);
    let (next, stats) = merge(
        &previous,
        fetched(vec![quote("600519", dec!(10), 100)]),
        quotes_equal,
        AbsentPolicy::Keep,
        MergeMode::Diff,
    );
    assert!(stats.is_noop());
    assert!(Arc::ptr_eq(&previous, &next));
    assert!(next.contains_key("000858"));
}

#[test]
fn drop_policy_removes_entries_missing_from_the_fetch() {
    let previous = snapshot(vec![
        quote("600519", dec!(10), 100),
        quote("000858", dec!(20), 200),
    ]);
    let (next, stats) = merge(
        &previous,
        fetched(vec![quote("600519", dec!(10), 100)]),
        quotes_equal,
        AbsentPolicy::Drop,
        MergeMode::Diff,
    );
    assert_eq!(stats.removed, 1);
    assert!(!next.contains_key("000858"));
    assert!(Arc::ptr_eq(&previous["600519"], &next["600519"]));
}

// =========================================================================
// Forced replacement
// =========================================================================

#[test]
fn replace_mode_adopts_fetched_entries_without_comparing() {
    let previous = snapshot(vec![quote("600519", dec!(10), 100)]);
    let (next, stats) = merge(
        &previous,
        fetched(vec![quote("600519", dec!(10), 100)]),
        quotes_equal,
        AbsentPolicy::Keep,
        MergeMode::Replace,
    );
    assert_eq!(stats.replaced, 1);
    assert!(!Arc::ptr_eq(&previous, &next));
    assert!(!Arc::ptr_eq(&previous["600519"], &next["600519"]));
}

// =========================================================================
// Series equality
// =========================================================================

#[test]
fn appending_a_new_final_bar_is_a_change() {
    let previous = vec![bar(30, dec!(10)), bar(31, dec!(11))];
    let grown = vec![bar(30, dec!(10)), bar(31, dec!(11)), bar(32, dec!(11))];
    assert!(series_equal(&previous, &previous.clone()));
    assert!(!series_equal(&previous, &grown));
}

#[test]
fn series_with_same_tail_and_length_within_one_is_unchanged() {
    let a = vec![bar(30, dec!(10)), bar(31, dec!(11))];
    let b = vec![bar(29, dec!(9)), bar(30, dec!(10)), bar(31, dec!(11))];
    assert!(series_equal(&a, &b));
}

#[test]
fn length_jump_greater_than_one_is_a_discontinuity() {
    let a = vec![bar(31, dec!(11))];
    let b = vec![bar(29, dec!(9)), bar(30, dec!(10)), bar(31, dec!(11))];
    assert!(!series_equal(&a, &b));
}

#[test]
fn changed_final_close_forces_replacement() {
    let a = vec![bar(30, dec!(10)), bar(31, dec!(11))];
    let b = vec![bar(30, dec!(10)), bar(31, dec!(11.5))];
    assert!(!series_equal(&a, &b));
}

#[test]
fn empty_series_cases() {
    let empty: Vec<PricePoint> = Vec::new();
    let one = vec![bar(30, dec!(10))];
    assert!(series_equal(&empty, &empty.clone()));
    assert!(!series_equal(&empty, &one));
}

// =========================================================================
// Missing symbol routing
// =========================================================================

#[test]
fn symbols_with_no_quote_and_no_series_are_missing() {
    let requested = vec![
        "600519".to_string(),
        "000858".to_string(),
        "300750".to_string(),
    ];
    let mut batch: HashMap<String, SymbolData> = HashMap::new();
    batch.insert(
        "600519".to_string(),
        SymbolData {
            quote: Some(quote("600519", dec!(10), 100)),
            intraday: None,
        },
    );
    batch.insert(
        "000858".to_string(),
        SymbolData {
            quote: None,
            intraday: Some(vec![bar(30, dec!(20))]),
        },
    );
    batch.insert("300750".to_string(), SymbolData::default());

    let missing = missing_symbols(&requested, &batch);
    assert_eq!(missing, vec!["300750".to_string()]);
}

#[test]
fn symbols_absent_from_the_batch_entirely_are_missing() {
    let requested = vec!["600519".to_string()];
    let missing = missing_symbols(&requested, &HashMap::new());
    assert_eq!(missing, vec!["600519".to_string()]);
}
