pub mod ledger_csv;
mod ledger_model;
mod ledger_traits;

pub use ledger_csv::{read_transactions, CsvTransactionSource};
pub use ledger_model::*;
pub use ledger_traits::*;

#[cfg(test)]
mod ledger_model_tests;
