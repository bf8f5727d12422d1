use crate::constants::DECIMAL_PRECISION;
use crate::errors::{DataGapError, Result};
use crate::portfolio::calendar::CalendarRow;
use crate::portfolio::valuation::{DailyValuation, DataGap, MarketValue, ValuationResult};
use crate::quotes::PriceHistory;
use crate::settings::MissingPricePolicy;

use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Chain-linked return state for one instrument.
///
/// A chain starts at the first held row with a known market value and ends
/// when the position goes flat. Unknown rows are skipped without breaking it.
#[derive(Debug, Clone, Copy, Default)]
struct ReturnChain {
    /// Last known market value of the current holding.
    anchor: Option<Decimal>,
    cumulative: Decimal,
}

impl ReturnChain {
    fn link(&mut self, shares: Decimal, market_value: MarketValue) -> Option<Decimal> {
        if shares <= Decimal::ZERO {
            *self = ReturnChain::default();
            return None;
        }
        let current = market_value.value()?;

        self.cumulative = match self.anchor {
            None => Decimal::ZERO,
            Some(previous) if previous.is_zero() => self.cumulative,
            Some(previous) => {
                let period_return = (current - previous) / previous;
                (Decimal::ONE + self.cumulative) * (Decimal::ONE + period_return) - Decimal::ONE
            }
        };
        self.anchor = Some(current);
        Some(self.cumulative.round_dp(DECIMAL_PRECISION))
    }
}

/// Joins calendar rows with close prices and computes market value, variation,
/// and cumulative return.
#[derive(Debug, Clone, Copy, Default)]
pub struct Valuator {
    policy: MissingPricePolicy,
}

impl Valuator {
    pub fn new(policy: MissingPricePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MissingPricePolicy {
        self.policy
    }

    /// Values `rows` in order. Rows may mix instruments; return chains and
    /// carried prices are tracked per instrument, so each instrument's rows
    /// must be chronological.
    ///
    /// Fails only under `MissingPricePolicy::Fail`, on the first held row
    /// without a close.
    pub fn value(&self, rows: &[CalendarRow], prices: &PriceHistory) -> Result<ValuationResult> {
        let mut chains: HashMap<&str, ReturnChain> = HashMap::new();
        let mut last_closes: HashMap<&str, (NaiveDate, Decimal)> = HashMap::new();
        let mut result = ValuationResult {
            valuations: Vec::with_capacity(rows.len()),
            data_gaps: Vec::new(),
        };

        for row in rows {
            let instrument = row.instrument.as_str();
            let observed = prices.close(row.date, instrument).map(|close| (row.date, close));
            let carried = last_closes.get(instrument).copied();
            if let Some(observed) = observed {
                last_closes.insert(instrument, observed);
            }

            let price = match (observed, self.policy) {
                (Some(observed), _) => Some(observed),
                (None, MissingPricePolicy::CarryForward) => carried,
                (None, _) => None,
            };

            let market_value = if row.shares.is_zero() {
                MarketValue::ZERO
            } else {
                match price {
                    Some((_, close)) => MarketValue::Known(row.shares * close),
                    None => {
                        if self.policy == MissingPricePolicy::Fail {
                            warn!("Missing close for {} on {}", instrument, row.date);
                            return Err(DataGapError {
                                instrument: row.instrument.clone(),
                                date: row.date,
                            }
                            .into());
                        }
                        result.data_gaps.push(DataGap {
                            instrument: row.instrument.clone(),
                            date: row.date,
                            shares: row.shares,
                        });
                        MarketValue::Unknown
                    }
                }
            };

            let cumulative_return = chains
                .entry(instrument)
                .or_default()
                .link(row.shares, market_value);

            result.valuations.push(DailyValuation {
                date: row.date,
                instrument: row.instrument.clone(),
                row_kind: row.row_kind,
                shares: row.shares,
                cost_basis: row.cost_basis,
                average_price: row.average_price,
                realized_profit: row.realized_profit,
                close_price: price.map(|(_, close)| close),
                price_date: price.map(|(date, _)| date),
                market_value,
                variation: market_value.map(|mv| mv - row.cost_basis),
                cumulative_return,
                liquidated: row.liquidated,
            });
        }

        if result.has_gaps() {
            warn!(
                "{} valuation rows have no close price (policy: {})",
                result.data_gaps.len(),
                self.policy.as_str()
            );
        }
        debug!("Valued {} calendar rows", result.valuations.len());
        Ok(result)
    }
}
