//! CSV-backed transaction ledger.
//!
//! Expected header: `Date,Transaction,Ticker,Shares,Price,Transaction Value,Settlement Fees,Fees`.
//! Other columns are ignored. Blank fee cells read as zero; every other field is required.

use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::errors::{Result, SourceError};
use crate::ledger::{Transaction, TransactionSource};
use crate::utils::{parse_date, parse_decimal, parse_optional_decimal};

#[derive(Debug, Deserialize)]
struct TransactionRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Transaction")]
    action: String,
    #[serde(rename = "Ticker")]
    ticker: String,
    #[serde(rename = "Shares")]
    shares: String,
    #[serde(rename = "Price")]
    price: String,
    #[serde(rename = "Transaction Value")]
    transaction_value: String,
    #[serde(rename = "Settlement Fees", default)]
    settlement_fees: String,
    #[serde(rename = "Fees", default)]
    fees: String,
}

impl TransactionRecord {
    fn into_transaction(self, sequence: usize) -> std::result::Result<Transaction, String> {
        let date = parse_date(&self.date).ok_or_else(|| format!("invalid date '{}'", self.date))?;
        let instrument = self.ticker.trim().to_string();
        if instrument.is_empty() {
            return Err("missing ticker".to_string());
        }
        Ok(Transaction {
            sequence,
            date,
            instrument,
            action: self.action,
            shares: parse_decimal(&self.shares, "Shares")?,
            price: parse_decimal(&self.price, "Price")?,
            transaction_value: parse_decimal(&self.transaction_value, "Transaction Value")?,
            settlement_fees: parse_optional_decimal(&self.settlement_fees)?
                .unwrap_or(Decimal::ZERO),
            fees: parse_optional_decimal(&self.fees)?.unwrap_or(Decimal::ZERO),
        })
    }
}

/// Reads transactions from any CSV reader. Row order becomes the ledger sequence.
pub fn read_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut transactions = Vec::new();
    let mut record = StringRecord::new();
    while rdr.read_record(&mut record)? {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let parsed: TransactionRecord = record
            .deserialize(Some(&headers))
            .map_err(|e| SourceError::Parse {
                line,
                message: e.to_string(),
            })?;
        let transaction = parsed
            .into_transaction(transactions.len())
            .map_err(|message| SourceError::Parse { line, message })?;
        transactions.push(transaction);
    }

    debug!("Read {} ledger transactions", transactions.len());
    Ok(transactions)
}

#[derive(Debug, Clone)]
pub struct CsvTransactionSource {
    path: PathBuf,
}

impl CsvTransactionSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TransactionSource for CsvTransactionSource {
    fn load_transactions(&self) -> Result<Vec<Transaction>> {
        let file = File::open(&self.path)?;
        read_transactions(file)
    }
}
