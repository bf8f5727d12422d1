use serde::{Serialize, Serializer};

use crate::errors::Error;
use crate::portfolio::accounting::LiquidationEvent;
use crate::portfolio::aggregation::{CurrentSnapshot, PortfolioTotal};
use crate::portfolio::valuation::{DailyValuation, DataGap};

/// An instrument dropped from the output because one of its stages failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentFailure {
    pub instrument: String,
    #[serde(serialize_with = "serialize_error")]
    pub error: Error,
}

fn serialize_error<S: Serializer>(error: &Error, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

impl std::fmt::Display for InstrumentFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.instrument, self.error)
    }
}

/// Everything one engine run derives from a ledger and a price history.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineOutput {
    /// Position time series, ordered by (date, instrument)
    pub positions: Vec<DailyValuation>,
    pub totals_by_date: Vec<PortfolioTotal>,
    pub current: CurrentSnapshot,
    /// Ordered by instrument
    pub failures: Vec<InstrumentFailure>,
    pub liquidations: Vec<LiquidationEvent>,
    pub data_gaps: Vec<DataGap>,
}

impl EngineOutput {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn positions_for<'a>(&'a self, instrument: &'a str) -> impl Iterator<Item = &'a DailyValuation> + 'a {
        self.positions.iter().filter(move |p| p.instrument == instrument)
    }
}
