use crate::errors::Result;
use crate::ledger::{Transaction, TransactionSource};
use crate::portfolio::accounting::{LiquidationEvent, PositionAccountant};
use crate::portfolio::aggregation::{calculate_current_snapshot, calculate_totals_by_date};
use crate::portfolio::calendar::{build_portfolio_calendar, expand_to_calendar};
use crate::portfolio::engine::{EngineOutput, InstrumentFailure};
use crate::portfolio::valuation::{DailyValuation, DataGap, Valuator};
use crate::quotes::{PriceHistory, PriceHistorySource};
use crate::settings::EngineSettings;

use chrono::NaiveDate;
use log::{debug, error, info, warn};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Derived series of a single instrument.
#[derive(Debug, Default)]
struct InstrumentRun {
    valuations: Vec<DailyValuation>,
    liquidations: Vec<LiquidationEvent>,
    data_gaps: Vec<DataGap>,
}

/// Runs the full pipeline: accounting, calendar expansion, valuation, and
/// aggregation. Every run recomputes from scratch.
#[derive(Debug, Clone, Default)]
pub struct PortfolioEngine {
    settings: EngineSettings,
}

impl PortfolioEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Loads both inputs and computes the output. Only loading errors are
    /// returned; per-instrument failures are reported in the output.
    pub fn run(
        &self,
        ledger: &dyn TransactionSource,
        prices: &dyn PriceHistorySource,
    ) -> Result<EngineOutput> {
        let transactions = ledger.load_transactions()?;
        let price_history = prices.load_price_history()?;
        match (price_history.first_trading_date(), price_history.last_trading_date()) {
            (Some(first), Some(last)) => info!(
                "Loaded {} transactions and {} trading dates ({} to {})",
                transactions.len(),
                price_history.len(),
                first,
                last
            ),
            _ => warn!("Loaded {} transactions and an empty price history", transactions.len()),
        }
        Ok(self.compute(transactions, &price_history))
    }

    pub fn compute(&self, transactions: Vec<Transaction>, prices: &PriceHistory) -> EngineOutput {
        let trading_dates = build_portfolio_calendar(&prices.trading_dates(), &transactions);
        let off_calendar = trading_dates.len() - prices.len();
        if off_calendar > 0 {
            warn!("{} transaction dates are not trading dates", off_calendar);
        }
        let partitions = partition_by_instrument(transactions);
        let priced = prices.instruments();
        for instrument in partitions.keys().filter(|i| !priced.contains(*i)) {
            warn!("No close prices for {}; its held rows cannot be valued", instrument);
        }

        let process = |(instrument, transactions): (&String, &Vec<Transaction>)| {
            (
                instrument.clone(),
                self.process_instrument(instrument, transactions, prices, &trading_dates),
            )
        };
        let results: Vec<(String, Result<InstrumentRun>)> = if self.settings.parallel {
            partitions.par_iter().map(process).collect()
        } else {
            partitions.iter().map(process).collect()
        };

        let mut output = EngineOutput::default();
        for (instrument, result) in results {
            match result {
                Ok(run) => {
                    output.positions.extend(run.valuations);
                    output.liquidations.extend(run.liquidations);
                    output.data_gaps.extend(run.data_gaps);
                }
                Err(e) => {
                    error!("Dropping {} from the portfolio: {}", instrument, e);
                    output.failures.push(InstrumentFailure { instrument, error: e });
                }
            }
        }

        output
            .positions
            .sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.instrument.cmp(&b.instrument)));
        output
            .liquidations
            .sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.sequence.cmp(&b.sequence)));
        output
            .data_gaps
            .sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.instrument.cmp(&b.instrument)));

        output.totals_by_date = calculate_totals_by_date(&output.positions);
        output.current = calculate_current_snapshot(&output.positions);

        info!(
            "Computed {} position rows for {} instruments ({} failed, {} data gaps)",
            output.positions.len(),
            partitions.len() - output.failures.len(),
            output.failures.len(),
            output.data_gaps.len()
        );
        output
    }

    fn process_instrument(
        &self,
        instrument: &str,
        transactions: &[Transaction],
        prices: &PriceHistory,
        trading_dates: &BTreeSet<NaiveDate>,
    ) -> Result<InstrumentRun> {
        let states = PositionAccountant::new().account(instrument, transactions)?;
        let liquidations = states
            .iter()
            .filter_map(|state| state.liquidation.clone())
            .collect();

        let rows = expand_to_calendar(&states, trading_dates);
        let valued = Valuator::new(self.settings.missing_price_policy).value(&rows, prices)?;
        debug!(
            "{}: {} transactions expanded to {} rows",
            instrument,
            transactions.len(),
            valued.valuations.len()
        );

        Ok(InstrumentRun {
            valuations: valued.valuations,
            liquidations,
            data_gaps: valued.data_gaps,
        })
    }
}

/// Groups transactions by instrument, each group stable-sorted by (date, sequence).
fn partition_by_instrument(transactions: Vec<Transaction>) -> BTreeMap<String, Vec<Transaction>> {
    let mut partitions: BTreeMap<String, Vec<Transaction>> = BTreeMap::new();
    for tx in transactions {
        partitions.entry(tx.instrument.clone()).or_default().push(tx);
    }
    for group in partitions.values_mut() {
        group.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.sequence.cmp(&b.sequence)));
    }
    partitions
}
