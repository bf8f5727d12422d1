//! Portfolio roll-up models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::valuation::MarketValue;

/// Total market value of the portfolio on one date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotal {
    pub date: NaiveDate,
    /// Sum across instruments. Unknown if any instrument's value is unknown.
    pub total_market_value: MarketValue,
    /// Number of instruments with a row on this date
    pub instrument_count: usize,
}

/// Latest state of one held instrument.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotHolding {
    pub instrument: String,
    /// Date of the row this holding was taken from
    pub date: NaiveDate,
    pub shares: Decimal,
    pub average_price: Decimal,
    pub cost_basis: Decimal,
    pub close_price: Option<Decimal>,
    pub market_value: MarketValue,
    pub variation: MarketValue,
    pub cumulative_return: Option<Decimal>,
}

/// Current holdings view, restricted to instruments with shares > 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSnapshot {
    /// Ordered by instrument id
    pub holdings: Vec<SnapshotHolding>,
    pub total_market_value: MarketValue,
    pub total_variation: MarketValue,
    /// Latest date among the holdings. `None` for an empty portfolio.
    pub as_of_date: Option<NaiveDate>,
}

impl CurrentSnapshot {
    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}
