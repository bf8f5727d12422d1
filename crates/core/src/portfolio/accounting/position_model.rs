use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::TransactionAction;

/// Position state of one instrument right after a ledger transaction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionState {
    pub instrument: String,
    pub date: NaiveDate,
    /// Ledger sequence of the transaction that produced this state.
    pub sequence: usize,
    pub action: TransactionAction,
    /// Cumulative shares held. Never negative.
    pub shares: Decimal,
    /// Total acquisition cost of the shares held, fees included.
    pub cost_basis: Decimal,
    /// `cost_basis / shares`, or zero when flat.
    pub average_price: Decimal,
    /// Proceeds net of fees minus the average cost of the shares sold. Zero on buys.
    pub realized_profit: Decimal,
    /// Set when the transaction sold more shares than were held.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidation: Option<LiquidationEvent>,
}

/// A sale larger than the position. The position is closed and the excess discarded.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiquidationEvent {
    pub instrument: String,
    pub date: NaiveDate,
    pub sequence: usize,
    pub shares_held: Decimal,
    pub shares_sold: Decimal,
    pub excess_shares: Decimal,
}

impl std::fmt::Display for LiquidationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} on {} (record #{}): sold {} with {} held, {} excess shares discarded",
            self.instrument,
            self.date,
            self.sequence,
            self.shares_sold,
            self.shares_held,
            self.excess_shares
        )
    }
}

/// Running totals carried between transactions of one instrument.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct RunningPosition {
    pub shares: Decimal,
    pub cost_basis: Decimal,
}

impl RunningPosition {
    pub fn average_price(&self) -> Decimal {
        if self.shares > Decimal::ZERO {
            self.cost_basis / self.shares
        } else {
            Decimal::ZERO
        }
    }
}
