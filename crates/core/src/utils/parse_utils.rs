use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::constants::DATE_FORMATS;

/// Parses a ledger or price-history date.
///
/// Accepts the formats in `DATE_FORMATS` and a `%Y-%m-%d %H:%M:%S` datetime,
/// whose time part is dropped.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Parses a decimal cell. Returns `None` for blank or `NaN` cells.
pub fn parse_optional_decimal(value: &str) -> Result<Option<Decimal>, String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map(Some)
        .map_err(|e| format!("'{}' is not a number: {}", value, e))
}

pub fn parse_decimal(value: &str, field: &str) -> Result<Decimal, String> {
    parse_optional_decimal(value)?.ok_or_else(|| format!("missing value for '{}'", field))
}
