use crate::portfolio::aggregation::{CurrentSnapshot, PortfolioTotal, SnapshotHolding};
use crate::portfolio::valuation::{DailyValuation, MarketValue};

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// Sums market value across instruments for every date in `valuations`.
///
/// When an instrument has more than one row on a date, the later row in
/// `valuations` wins.
pub fn calculate_totals_by_date(valuations: &[DailyValuation]) -> Vec<PortfolioTotal> {
    let mut by_date: BTreeMap<NaiveDate, HashMap<&str, MarketValue>> = BTreeMap::new();
    for valuation in valuations {
        by_date
            .entry(valuation.date)
            .or_default()
            .insert(valuation.instrument.as_str(), valuation.market_value);
    }

    by_date
        .into_iter()
        .map(|(date, latest)| PortfolioTotal {
            date,
            total_market_value: latest.values().sum(),
            instrument_count: latest.len(),
        })
        .collect()
}

/// Builds the current holdings view from each instrument's most recent row.
pub fn calculate_current_snapshot(valuations: &[DailyValuation]) -> CurrentSnapshot {
    let mut latest: BTreeMap<&str, &DailyValuation> = BTreeMap::new();
    for valuation in valuations {
        match latest.get(valuation.instrument.as_str()) {
            Some(current) if current.date > valuation.date => {}
            _ => {
                latest.insert(valuation.instrument.as_str(), valuation);
            }
        }
    }

    let holdings: Vec<SnapshotHolding> = latest
        .into_values()
        .filter(|v| v.shares > Decimal::ZERO)
        .map(|v| SnapshotHolding {
            instrument: v.instrument.clone(),
            date: v.date,
            shares: v.shares,
            average_price: v.average_price,
            cost_basis: v.cost_basis,
            close_price: v.close_price,
            market_value: v.market_value,
            variation: v.variation,
            cumulative_return: v.cumulative_return,
        })
        .collect();

    debug!("Current snapshot holds {} instruments", holdings.len());

    CurrentSnapshot {
        total_market_value: holdings.iter().map(|h| h.market_value).sum(),
        total_variation: holdings.iter().map(|h| h.variation).sum(),
        as_of_date: holdings.iter().map(|h| h.date).max(),
        holdings,
    }
}
