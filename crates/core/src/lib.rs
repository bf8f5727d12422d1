//! Equitrack Core - portfolio accounting over a transaction ledger and daily closes.
//!
//! The engine folds each instrument's ledger into average-cost position states,
//! projects them onto the trading calendar, values every row against the close
//! price history, and rolls the result up into per-date totals and a current
//! snapshot. Inputs come from any `TransactionSource` / `PriceHistorySource`;
//! CSV implementations of both are included.

pub mod constants;
pub mod errors;
pub mod ledger;
pub mod portfolio;
pub mod quotes;
pub mod settings;
pub mod utils;

// Re-export the pipeline entry points and output models
pub use ledger::{Transaction, TransactionAction, TransactionSource};
pub use portfolio::*;
pub use quotes::{PriceHistory, PriceHistorySource};
pub use settings::{EngineSettings, MissingPricePolicy};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
