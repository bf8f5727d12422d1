//! Average-cost position accounting.

pub mod position_accountant;
mod position_model;

pub use position_accountant::*;
pub use position_model::*;
