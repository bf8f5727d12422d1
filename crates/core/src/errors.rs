//! Core error types for the Equitrack engine.
//!
//! The engine is deterministic, so none of these errors are retried. A
//! validation or data-gap failure aborts the affected instrument only; the
//! engine reports it alongside the rows of the instruments that succeeded.

use chrono::NaiveDate;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Price history gap: {0}")]
    DataGap(#[from] DataGapError),

    #[error("Failed to load input: {0}")]
    Source(#[from] SourceError),

    #[error("Invalid engine settings: {0}")]
    Settings(String),
}

/// Identifies the ledger record that triggered an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRef {
    pub instrument: String,
    pub date: NaiveDate,
    /// Position of the record in the original ledger.
    pub sequence: usize,
}

impl std::fmt::Display for RecordRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "record #{} ({} on {})",
            self.sequence, self.instrument, self.date
        )
    }
}

/// Malformed or out-of-order transactions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unknown transaction action '{action}' in {record}")]
    UnknownAction { action: String, record: RecordRef },

    #[error("Share count must be positive, got {shares} in {record}")]
    NonPositiveShares { shares: String, record: RecordRef },

    #[error("Share count must be a whole number, got {shares} in {record}")]
    FractionalShares { shares: String, record: RecordRef },

    #[error("Field '{field}' must not be negative, got {value} in {record}")]
    NegativeAmount {
        field: &'static str,
        value: String,
        record: RecordRef,
    },

    #[error("{record} is out of sequence: previous record was #{previous_sequence} on {previous_date}")]
    OutOfOrder {
        record: RecordRef,
        previous_date: NaiveDate,
        previous_sequence: usize,
    },

    #[error("{record} repeats the ledger sequence of the previous record")]
    DuplicateSequence { record: RecordRef },

    #[error("{record} does not belong to instrument '{expected}'")]
    InstrumentMismatch { expected: String, record: RecordRef },
}

impl ValidationError {
    /// The ledger record that failed validation.
    pub fn record(&self) -> &RecordRef {
        match self {
            ValidationError::UnknownAction { record, .. }
            | ValidationError::NonPositiveShares { record, .. }
            | ValidationError::FractionalShares { record, .. }
            | ValidationError::NegativeAmount { record, .. }
            | ValidationError::OutOfOrder { record, .. }
            | ValidationError::DuplicateSequence { record }
            | ValidationError::InstrumentMismatch { record, .. } => record,
        }
    }
}

/// A close price required for valuation is absent from the price history.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No close price for {instrument} on {date}")]
pub struct DataGapError {
    pub instrument: String,
    pub date: NaiveDate,
}

/// Errors raised while reading ledger or price-history inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Line {line}: {message}")]
    Parse { line: u64, message: String },
}

// === From implementations for common error types ===

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Source(SourceError::Io(err.to_string()))
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Source(SourceError::Csv(err.to_string()))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Settings(err.to_string())
    }
}
