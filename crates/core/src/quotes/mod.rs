//! Close-price history: model, source trait, and CSV import.

pub mod import;
mod model;
mod store;

pub use import::{read_price_history, CsvPriceHistorySource};
pub use model::*;
pub use store::*;
