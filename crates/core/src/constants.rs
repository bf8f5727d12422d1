/// Decimal precision for return figures
pub const DECIMAL_PRECISION: u32 = 6;

/// Ledger action for purchases
pub const ACTION_BUY: &str = "BUY";

/// Ledger action for sales
pub const ACTION_SELL: &str = "SELL";

/// Row kind for forward-filled days without a transaction
pub const ROW_KIND_CARRY: &str = "CARRY";

/// Date formats accepted by the CSV sources, tried in order
pub const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
