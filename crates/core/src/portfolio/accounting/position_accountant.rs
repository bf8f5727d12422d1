use log::{debug, warn};
use rust_decimal::Decimal;

use crate::errors::{Result, ValidationError};
use crate::ledger::{Transaction, TransactionAction};
use crate::portfolio::accounting::{LiquidationEvent, PositionState, RunningPosition};

/// Folds one instrument's ledger into position states under the average-cost method.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionAccountant;

impl PositionAccountant {
    pub fn new() -> Self {
        Self
    }

    /// Returns one `PositionState` per transaction, in input order.
    ///
    /// `transactions` must all belong to `instrument` and be sorted by date,
    /// same-date records by ascending ledger sequence. Any malformed or
    /// out-of-order record aborts the whole instrument.
    pub fn account(&self, instrument: &str, transactions: &[Transaction]) -> Result<Vec<PositionState>> {
        let (position, states) = transactions.iter().try_fold(
            (
                RunningPosition::default(),
                Vec::with_capacity(transactions.len()),
            ),
            |(position, mut states), tx| -> Result<_> {
                Self::check_order(instrument, states.last(), tx)?;
                let action = tx.validate()?;
                let (next, state) = Self::apply(position, tx, action);
                states.push(state);
                Ok((next, states))
            },
        )?;

        debug!(
            "Accounted {} transactions for {}: {} shares, cost basis {}",
            states.len(),
            instrument,
            position.shares,
            position.cost_basis
        );
        Ok(states)
    }

    fn check_order(
        instrument: &str,
        previous: Option<&PositionState>,
        tx: &Transaction,
    ) -> std::result::Result<(), ValidationError> {
        if tx.instrument != instrument {
            return Err(ValidationError::InstrumentMismatch {
                expected: instrument.to_string(),
                record: tx.record_ref(),
            });
        }
        if let Some(prev) = previous {
            if tx.date == prev.date && tx.sequence == prev.sequence {
                return Err(ValidationError::DuplicateSequence {
                    record: tx.record_ref(),
                });
            }
            let in_order = tx.date > prev.date || (tx.date == prev.date && tx.sequence > prev.sequence);
            if !in_order {
                return Err(ValidationError::OutOfOrder {
                    record: tx.record_ref(),
                    previous_date: prev.date,
                    previous_sequence: prev.sequence,
                });
            }
        }
        Ok(())
    }

    /// Applies a validated transaction to the running position.
    fn apply(
        position: RunningPosition,
        tx: &Transaction,
        action: TransactionAction,
    ) -> (RunningPosition, PositionState) {
        let mut liquidation = None;
        let mut realized_profit = Decimal::ZERO;

        let next = match action {
            TransactionAction::Buy => RunningPosition {
                shares: position.shares + tx.shares,
                cost_basis: position.cost_basis + tx.transaction_value + tx.total_fees(),
            },
            TransactionAction::Sell => {
                let average_before = position.average_price();
                realized_profit =
                    (tx.transaction_value - tx.total_fees()) - average_before * tx.shares;

                if position.shares >= tx.shares {
                    let shares = position.shares - tx.shares;
                    let cost_basis = if shares.is_zero() {
                        Decimal::ZERO
                    } else {
                        position.cost_basis - average_before * tx.shares
                    };
                    RunningPosition { shares, cost_basis }
                } else {
                    let event = LiquidationEvent {
                        instrument: tx.instrument.clone(),
                        date: tx.date,
                        sequence: tx.sequence,
                        shares_held: position.shares,
                        shares_sold: tx.shares,
                        excess_shares: tx.shares - position.shares,
                    };
                    warn!("Oversell liquidated position: {}", event);
                    liquidation = Some(event);
                    RunningPosition::default()
                }
            }
        };

        let state = PositionState {
            instrument: tx.instrument.clone(),
            date: tx.date,
            sequence: tx.sequence,
            action,
            shares: next.shares,
            cost_basis: next.cost_basis,
            average_price: next.average_price(),
            realized_profit,
            liquidation,
        };
        (next, state)
    }
}
