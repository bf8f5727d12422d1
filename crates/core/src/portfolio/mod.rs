pub mod accounting;
pub mod aggregation;
pub mod calendar;
pub mod engine;
pub mod valuation;

pub use accounting::{LiquidationEvent, PositionAccountant, PositionState};
pub use aggregation::{CurrentSnapshot, PortfolioTotal, SnapshotHolding};
pub use calendar::{CalendarRow, RowKind};
pub use engine::{EngineOutput, InstrumentFailure, PortfolioEngine};
pub use valuation::{DailyValuation, DataGap, MarketValue, ValuationResult, Valuator};
