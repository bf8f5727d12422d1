use chrono::NaiveDate;
use log::debug;
use std::collections::BTreeSet;

use crate::ledger::Transaction;
use crate::portfolio::accounting::PositionState;
use crate::portfolio::calendar::CalendarRow;

/// Portfolio-wide date grid: every trading date plus every transaction date.
///
/// Expanding all instruments over the same grid gives each held instrument a
/// row on a date that only another instrument traded on.
pub fn build_portfolio_calendar(
    trading_dates: &BTreeSet<NaiveDate>,
    transactions: &[Transaction],
) -> BTreeSet<NaiveDate> {
    let mut calendar = trading_dates.clone();
    calendar.extend(transactions.iter().map(|tx| tx.date));
    calendar
}

/// Builds the date index for one instrument: every trading date from its first
/// transaction through the end of the calendar, plus its own transaction dates.
///
/// The end is the later of the last trading date and the last transaction date.
pub fn build_date_index(
    states: &[PositionState],
    trading_dates: &BTreeSet<NaiveDate>,
) -> BTreeSet<NaiveDate> {
    let (Some(first), Some(last)) = (states.first(), states.last()) else {
        return BTreeSet::new();
    };
    let end = trading_dates
        .last()
        .map_or(last.date, |d| (*d).max(last.date))
        .max(first.date);

    let mut index: BTreeSet<NaiveDate> = trading_dates.range(first.date..=end).copied().collect();
    index.extend(states.iter().map(|s| s.date));
    index
}

/// Projects one instrument's position states onto the trading calendar.
///
/// Days with transactions take the state after the day's last transaction;
/// other days carry the previous state forward. Nothing is emitted before the
/// first transaction. `states` must be in accounting order.
pub fn expand_to_calendar(
    states: &[PositionState],
    trading_dates: &BTreeSet<NaiveDate>,
) -> Vec<CalendarRow> {
    debug_assert!(
        states.windows(2).all(|w| w[0].date <= w[1].date),
        "position states must be chronological"
    );

    let index = build_date_index(states, trading_dates);
    let mut events = states.iter().peekable();
    let mut carried: Option<&PositionState> = None;
    let mut rows = Vec::with_capacity(index.len());

    for date in index {
        let mut day_events = Vec::new();
        while let Some(state) = events.next_if(|s| s.date == date) {
            day_events.push(state);
        }

        let row = match CalendarRow::from_events(date, &day_events) {
            Some(row) => {
                carried = day_events.last().copied();
                Some(row)
            }
            None => carried.map(|state| CalendarRow::carry(date, state)),
        };
        rows.extend(row);
    }

    if let Some(first) = states.first() {
        debug!(
            "Expanded {} states for {} into {} calendar rows",
            states.len(),
            first.instrument,
            rows.len()
        );
    }
    rows
}
