//! Source trait for close-price history.

use crate::errors::Result;
use crate::quotes::PriceHistory;

/// Supplies per-instrument daily close prices.
pub trait PriceHistorySource: Send + Sync {
    fn load_price_history(&self) -> Result<PriceHistory>;
}

impl PriceHistorySource for PriceHistory {
    fn load_price_history(&self) -> Result<PriceHistory> {
        Ok(self.clone())
    }
}
