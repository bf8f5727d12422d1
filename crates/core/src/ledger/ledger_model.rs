//! Ledger domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::{ACTION_BUY, ACTION_SELL};
use crate::errors::{RecordRef, ValidationError};

/// Direction of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionAction {
    Buy,
    Sell,
}

impl TransactionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionAction::Buy => ACTION_BUY,
            TransactionAction::Sell => ACTION_SELL,
        }
    }
}

impl FromStr for TransactionAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        if normalized.eq_ignore_ascii_case(ACTION_BUY) {
            Ok(TransactionAction::Buy)
        } else if normalized.eq_ignore_ascii_case(ACTION_SELL) {
            Ok(TransactionAction::Sell)
        } else {
            Err(format!("'{}' is not a valid transaction action", s))
        }
    }
}

impl std::fmt::Display for TransactionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single ledger record, as read from the transaction source.
///
/// `action` keeps the raw ledger text; it is parsed during accounting so that
/// an unknown action aborts its instrument instead of being dropped at load
/// time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Position in the original ledger. Breaks ties between same-date records.
    pub sequence: usize,
    pub date: NaiveDate,
    pub instrument: String,
    pub action: String,
    pub shares: Decimal,
    /// Unit price paid or received. Informational; accounting uses `transaction_value`.
    pub price: Decimal,
    /// Gross value of the trade.
    pub transaction_value: Decimal,
    pub settlement_fees: Decimal,
    pub fees: Decimal,
}

impl Transaction {
    /// Creates a fee-free trade whose gross value is `shares * price`.
    pub fn trade(
        sequence: usize,
        date: NaiveDate,
        instrument: &str,
        action: TransactionAction,
        shares: Decimal,
        price: Decimal,
    ) -> Self {
        Transaction {
            sequence,
            date,
            instrument: instrument.to_string(),
            action: action.as_str().to_string(),
            shares,
            price,
            transaction_value: shares * price,
            settlement_fees: Decimal::ZERO,
            fees: Decimal::ZERO,
        }
    }

    pub fn with_fees(mut self, settlement_fees: Decimal, fees: Decimal) -> Self {
        self.settlement_fees = settlement_fees;
        self.fees = fees;
        self
    }

    /// Settlement fees plus other fees.
    pub fn total_fees(&self) -> Decimal {
        self.settlement_fees + self.fees
    }

    pub fn record_ref(&self) -> RecordRef {
        RecordRef {
            instrument: self.instrument.clone(),
            date: self.date,
            sequence: self.sequence,
        }
    }

    /// Checks the record and returns its parsed action.
    pub fn validate(&self) -> Result<TransactionAction, ValidationError> {
        let action =
            TransactionAction::from_str(&self.action).map_err(|_| ValidationError::UnknownAction {
                action: self.action.clone(),
                record: self.record_ref(),
            })?;

        if self.shares <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveShares {
                shares: self.shares.to_string(),
                record: self.record_ref(),
            });
        }
        if !self.shares.fract().is_zero() {
            return Err(ValidationError::FractionalShares {
                shares: self.shares.to_string(),
                record: self.record_ref(),
            });
        }

        let amounts = [
            ("price", self.price),
            ("transactionValue", self.transaction_value),
            ("settlementFees", self.settlement_fees),
            ("fees", self.fees),
        ];
        if let Some(&(field, value)) = amounts.iter().find(|(_, v)| *v < Decimal::ZERO) {
            return Err(ValidationError::NegativeAmount {
                field,
                value: value.to_string(),
                record: self.record_ref(),
            });
        }

        Ok(action)
    }
}
