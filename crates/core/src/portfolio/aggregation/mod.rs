//! Per-date totals and the current portfolio snapshot.

pub mod aggregator;
mod aggregation_model;

pub use aggregation_model::*;
pub use aggregator::*;
