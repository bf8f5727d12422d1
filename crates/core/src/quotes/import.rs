//! CSV import of close-price history in wide form.
//!
//! The first column is `Date`; every other column is a ticker whose cells hold
//! that day's close. A blank or `NaN` cell means no price, never zero.

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::errors::{Result, SourceError};
use crate::quotes::{PriceHistory, PriceHistorySource};
use crate::utils::{parse_date, parse_optional_decimal};

pub fn read_price_history<R: Read>(reader: R) -> Result<PriceHistory> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let date_column = headers.iter().next().unwrap_or_default();
    if !date_column.eq_ignore_ascii_case("date") {
        return Err(SourceError::Parse {
            line: 1,
            message: format!("first column must be 'Date', found '{}'", date_column),
        }
        .into());
    }
    let tickers: Vec<&str> = headers.iter().skip(1).collect();
    if tickers.is_empty() {
        warn!("Price history has no ticker columns");
    }

    let mut history = PriceHistory::new();
    let mut record = StringRecord::new();
    while rdr.read_record(&mut record)? {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let raw_date = record.get(0).unwrap_or_default();
        let date = parse_date(raw_date).ok_or_else(|| SourceError::Parse {
            line,
            message: format!("invalid date '{}'", raw_date),
        })?;
        history.add_trading_date(date);

        for (ticker, cell) in tickers.iter().zip(record.iter().skip(1)) {
            let close = parse_optional_decimal(cell)
                .map_err(|message| SourceError::Parse { line, message })?;
            match close {
                Some(close) if close.is_sign_negative() && !close.is_zero() => {
                    return Err(SourceError::Parse {
                        line,
                        message: format!("negative close {} for {}", close, ticker),
                    }
                    .into());
                }
                Some(close) => history.insert(date, ticker, close),
                None => {}
            }
        }
    }

    debug!(
        "Read {} trading days for {} instruments",
        history.len(),
        tickers.len()
    );
    Ok(history)
}

#[derive(Debug, Clone)]
pub struct CsvPriceHistorySource {
    path: PathBuf,
}

impl CsvPriceHistorySource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PriceHistorySource for CsvPriceHistorySource {
    fn load_price_history(&self) -> Result<PriceHistory> {
        let file = File::open(&self.path)?;
        read_price_history(file)
    }
}
