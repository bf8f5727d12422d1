use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{ACTION_BUY, ACTION_SELL, ROW_KIND_CARRY};
use crate::ledger::TransactionAction;
use crate::portfolio::accounting::PositionState;

/// Origin of a calendar row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RowKind {
    Buy,
    Sell,
    /// No transaction that day; position fields are forward-filled.
    Carry,
}

impl RowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowKind::Buy => ACTION_BUY,
            RowKind::Sell => ACTION_SELL,
            RowKind::Carry => ROW_KIND_CARRY,
        }
    }
}

impl From<TransactionAction> for RowKind {
    fn from(action: TransactionAction) -> Self {
        match action {
            TransactionAction::Buy => RowKind::Buy,
            TransactionAction::Sell => RowKind::Sell,
        }
    }
}

/// One instrument's position on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRow {
    pub date: NaiveDate,
    pub instrument: String,
    pub row_kind: RowKind,
    pub shares: Decimal,
    pub cost_basis: Decimal,
    pub average_price: Decimal,
    /// Realized profit booked that day. Zero on carry rows.
    pub realized_profit: Decimal,
    /// Transactions merged into this row.
    pub event_count: usize,
    /// Any of the merged transactions liquidated the position.
    pub liquidated: bool,
}

impl CalendarRow {
    /// Row for a day with transactions. `events` must be non-empty and in ledger order.
    pub(crate) fn from_events(date: NaiveDate, events: &[&PositionState]) -> Option<Self> {
        let last = events.last()?;
        Some(CalendarRow {
            date,
            instrument: last.instrument.clone(),
            row_kind: last.action.into(),
            shares: last.shares,
            cost_basis: last.cost_basis,
            average_price: last.average_price,
            realized_profit: events.iter().map(|e| e.realized_profit).sum(),
            event_count: events.len(),
            liquidated: events.iter().any(|e| e.liquidation.is_some()),
        })
    }

    /// Forward-filled row. Only position fields are carried.
    pub(crate) fn carry(date: NaiveDate, state: &PositionState) -> Self {
        CalendarRow {
            date,
            instrument: state.instrument.clone(),
            row_kind: RowKind::Carry,
            shares: state.shares,
            cost_basis: state.cost_basis,
            average_price: state.average_price,
            realized_profit: Decimal::ZERO,
            event_count: 0,
            liquidated: false,
        }
    }
}
