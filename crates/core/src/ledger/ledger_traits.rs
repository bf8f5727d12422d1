//! Source traits for the transaction ledger.

use crate::errors::Result;
use crate::ledger::Transaction;

/// Supplies the raw transaction ledger in its original order.
///
/// Sequences must be unique per instrument on a given date; a repeat fails
/// that instrument with `ValidationError::DuplicateSequence`.
pub trait TransactionSource: Send + Sync {
    fn load_transactions(&self) -> Result<Vec<Transaction>>;
}

impl TransactionSource for Vec<Transaction> {
    fn load_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.clone())
    }
}
