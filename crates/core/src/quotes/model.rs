//! Close-price history models.
//!
//! The history is the trading calendar: every date it contains is a trading
//! day, even when no instrument has a close on it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Close prices addressable by (date, instrument).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceHistory {
    closes: BTreeMap<NaiveDate, HashMap<String, Decimal>>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a trading day, with or without prices.
    pub fn add_trading_date(&mut self, date: NaiveDate) {
        self.closes.entry(date).or_default();
    }

    /// Records a close price, replacing any earlier value for the same key.
    pub fn insert(&mut self, date: NaiveDate, instrument: &str, close: Decimal) {
        self.closes
            .entry(date)
            .or_default()
            .insert(instrument.to_string(), close);
    }

    pub fn close(&self, date: NaiveDate, instrument: &str) -> Option<Decimal> {
        self.closes
            .get(&date)
            .and_then(|day| day.get(instrument))
            .copied()
    }

    pub fn trading_dates(&self) -> BTreeSet<NaiveDate> {
        self.closes.keys().copied().collect()
    }

    pub fn first_trading_date(&self) -> Option<NaiveDate> {
        self.closes.keys().next().copied()
    }

    pub fn last_trading_date(&self) -> Option<NaiveDate> {
        self.closes.keys().next_back().copied()
    }

    pub fn instruments(&self) -> BTreeSet<String> {
        self.closes
            .values()
            .flat_map(|day| day.keys().cloned())
            .collect()
    }

    /// Number of trading days.
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}
