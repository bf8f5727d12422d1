//! End-to-end portfolio computation over a ledger and a price history.

mod engine_model;
pub mod portfolio_engine;

pub use engine_model::*;
pub use portfolio_engine::*;

#[cfg(test)]
mod portfolio_engine_tests;
