//! Projection of sparse position states onto the trading calendar.

pub mod calendar_expander;
mod calendar_model;

pub use calendar_expander::*;
pub use calendar_model::*;
