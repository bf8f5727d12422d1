//! Daily valuation domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::iter::Sum;
use std::ops::Add;

use crate::portfolio::calendar::RowKind;

const UNKNOWN_MARKER: &str = "unknown";

/// A monetary value that may be unknown because a close price was missing.
///
/// Unknown is contagious: any sum that includes an unknown term is unknown.
/// Serializes as a number, or as the string `"unknown"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketValue {
    Known(Decimal),
    Unknown,
}

impl MarketValue {
    pub const ZERO: MarketValue = MarketValue::Known(Decimal::ZERO);

    pub fn is_known(&self) -> bool {
        matches!(self, MarketValue::Known(_))
    }

    pub fn value(&self) -> Option<Decimal> {
        match self {
            MarketValue::Known(v) => Some(*v),
            MarketValue::Unknown => None,
        }
    }

    pub fn map<F: FnOnce(Decimal) -> Decimal>(self, f: F) -> MarketValue {
        match self {
            MarketValue::Known(v) => MarketValue::Known(f(v)),
            MarketValue::Unknown => MarketValue::Unknown,
        }
    }
}

impl Default for MarketValue {
    fn default() -> Self {
        MarketValue::ZERO
    }
}

impl From<Option<Decimal>> for MarketValue {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(MarketValue::Unknown, MarketValue::Known)
    }
}

impl Add for MarketValue {
    type Output = MarketValue;

    fn add(self, other: MarketValue) -> MarketValue {
        match (self, other) {
            (MarketValue::Known(a), MarketValue::Known(b)) => MarketValue::Known(a + b),
            _ => MarketValue::Unknown,
        }
    }
}

impl Sum for MarketValue {
    fn sum<I: Iterator<Item = MarketValue>>(iter: I) -> Self {
        iter.fold(MarketValue::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a MarketValue> for MarketValue {
    fn sum<I: Iterator<Item = &'a MarketValue>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl std::fmt::Display for MarketValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketValue::Known(v) => write!(f, "{}", v),
            MarketValue::Unknown => f.write_str(UNKNOWN_MARKER),
        }
    }
}

impl Serialize for MarketValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MarketValue::Known(v) => Serialize::serialize(v, serializer),
            MarketValue::Unknown => serializer.serialize_str(UNKNOWN_MARKER),
        }
    }
}

impl<'de> Deserialize<'de> for MarketValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Known(Decimal),
            Marker(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Known(v) => Ok(MarketValue::Known(v)),
            Repr::Marker(s) if s == UNKNOWN_MARKER => Ok(MarketValue::Unknown),
            Repr::Marker(s) => Err(serde::de::Error::custom(format!(
                "expected a number or \"{}\", got \"{}\"",
                UNKNOWN_MARKER, s
            ))),
        }
    }
}

/// One row of the position time series: a calendar row joined with its close price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyValuation {
    pub date: NaiveDate,
    pub instrument: String,
    pub row_kind: RowKind,
    pub shares: Decimal,
    pub cost_basis: Decimal,
    pub average_price: Decimal,
    pub realized_profit: Decimal,
    /// Close used for the valuation, if any.
    pub close_price: Option<Decimal>,
    /// Date the close was observed. Earlier than `date` when carried forward.
    pub price_date: Option<NaiveDate>,
    /// `shares * close_price`
    pub market_value: MarketValue,
    /// `market_value - cost_basis`
    pub variation: MarketValue,
    /// Chain-linked return since the current holding's first known valuation.
    /// Absent while flat or when the market value is unknown.
    pub cumulative_return: Option<Decimal>,
    pub liquidated: bool,
}

/// A held position that had no close price on a required date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataGap {
    pub instrument: String,
    pub date: NaiveDate,
    pub shares: Decimal,
}

impl std::fmt::Display for DataGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "no close for {} on {} ({} shares held)",
            self.instrument, self.date, self.shares
        )
    }
}

/// Output of valuing a set of calendar rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValuationResult {
    pub valuations: Vec<DailyValuation>,
    pub data_gaps: Vec<DataGap>,
}

impl ValuationResult {
    pub fn has_gaps(&self) -> bool {
        !self.data_gaps.is_empty()
    }
}
