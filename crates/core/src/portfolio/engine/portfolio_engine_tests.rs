#[cfg(test)]
mod tests {
    use crate::errors::{Error, SourceError, ValidationError};
    use crate::ledger::{Transaction, TransactionAction, TransactionSource};
    use crate::portfolio::calendar::RowKind;
    use crate::portfolio::engine::PortfolioEngine;
    use crate::portfolio::valuation::MarketValue;
    use crate::quotes::PriceHistory;
    use crate::settings::{EngineSettings, MissingPricePolicy};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
    }

    fn buy(seq: usize, d: u32, instrument: &str, shares: Decimal, price: Decimal) -> Transaction {
        Transaction::trade(seq, day(d), instrument, TransactionAction::Buy, shares, price)
    }

    fn sell(seq: usize, d: u32, instrument: &str, shares: Decimal, price: Decimal) -> Transaction {
        Transaction::trade(seq, day(d), instrument, TransactionAction::Sell, shares, price)
    }

    fn history() -> PriceHistory {
        let mut prices = PriceHistory::new();
        for (d, petr, vale) in [
            (2, dec!(30), dec!(60)),
            (3, dec!(31), dec!(62)),
            (4, dec!(33), dec!(61)),
            (5, dec!(32), dec!(65)),
        ] {
            prices.insert(day(d), "PETR4", petr);
            prices.insert(day(d), "VALE3", vale);
        }
        prices
    }

    fn ledger() -> Vec<Transaction> {
        vec![
            buy(0, 2, "PETR4", dec!(100), dec!(30)).with_fees(dec!(0.5), dec!(4.5)),
            buy(1, 3, "VALE3", dec!(10), dec!(62)),
            sell(2, 4, "PETR4", dec!(40), dec!(33)).with_fees(Decimal::ZERO, dec!(2)),
        ]
    }

    struct FailingLedger;

    impl TransactionSource for FailingLedger {
        fn load_transactions(&self) -> crate::Result<Vec<Transaction>> {
            Err(SourceError::Io("ledger unavailable".to_string()).into())
        }
    }

    #[test]
    fn test_positions_are_ordered_by_date_then_instrument() {
        let output = PortfolioEngine::default().compute(ledger(), &history());

        let keys: Vec<(NaiveDate, &str)> = output
            .positions
            .iter()
            .map(|p| (p.date, p.instrument.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (day(2), "PETR4"),
                (day(3), "PETR4"),
                (day(3), "VALE3"),
                (day(4), "PETR4"),
                (day(4), "VALE3"),
                (day(5), "PETR4"),
                (day(5), "VALE3"),
            ]
        );
        assert!(!output.has_failures());
        assert!(output.data_gaps.is_empty());
    }

    #[test]
    fn test_end_to_end_figures() {
        let output = PortfolioEngine::default().compute(ledger(), &history());

        let petr: Vec<_> = output.positions_for("PETR4").collect();
        assert_eq!(petr[0].cost_basis, dec!(3005));
        assert_eq!(petr[0].average_price, dec!(30.05));
        assert_eq!(petr[2].row_kind, RowKind::Sell);
        assert_eq!(petr[2].shares, dec!(60));
        assert_eq!(petr[2].cost_basis, dec!(1803));
        // (1320 - 2) - 30.05 * 40
        assert_eq!(petr[2].realized_profit, dec!(116));
        assert_eq!(petr[3].realized_profit, Decimal::ZERO);

        let totals: Vec<(NaiveDate, MarketValue)> = output
            .totals_by_date
            .iter()
            .map(|t| (t.date, t.total_market_value))
            .collect();
        assert_eq!(
            totals,
            vec![
                (day(2), MarketValue::Known(dec!(3000))),
                (day(3), MarketValue::Known(dec!(3720))),
                (day(4), MarketValue::Known(dec!(2590))),
                (day(5), MarketValue::Known(dec!(2570))),
            ]
        );

        let current = &output.current;
        assert_eq!(current.as_of_date, Some(day(5)));
        assert_eq!(current.holdings.len(), 2);
        assert_eq!(current.total_market_value, MarketValue::Known(dec!(2570)));
        // (1920 - 1803) + (650 - 620)
        assert_eq!(current.total_variation, MarketValue::Known(dec!(147)));
    }

    #[test]
    fn test_ledger_order_is_restored_per_instrument() {
        let mut shuffled = ledger();
        shuffled.reverse();
        let ordered = PortfolioEngine::default().compute(ledger(), &history());
        let reversed = PortfolioEngine::default().compute(shuffled, &history());
        assert_eq!(ordered, reversed);
    }

    #[test]
    fn test_invalid_instrument_is_reported_and_others_continue() {
        let mut txs = ledger();
        txs.push(Transaction {
            action: "SPLIT".to_string(),
            ..buy(3, 5, "VALE3", dec!(1), dec!(65))
        });
        let output = PortfolioEngine::default().compute(txs, &history());

        assert_eq!(output.failures.len(), 1);
        let failure = &output.failures[0];
        assert_eq!(failure.instrument, "VALE3");
        match &failure.error {
            Error::Validation(ValidationError::UnknownAction { action, record }) => {
                assert_eq!(action, "SPLIT");
                assert_eq!(record.sequence, 3);
                assert_eq!(record.date, day(5));
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(output.positions.iter().all(|p| p.instrument == "PETR4"));
        assert_eq!(output.positions.len(), 4);
        assert_eq!(output.current.holdings.len(), 1);
    }

    #[test]
    fn test_oversell_is_reported_as_liquidation() {
        let txs = vec![
            buy(0, 2, "PETR4", dec!(10), dec!(30)),
            sell(1, 3, "PETR4", dec!(15), dec!(31)),
        ];
        let output = PortfolioEngine::default().compute(txs, &history());

        assert_eq!(output.liquidations.len(), 1);
        assert_eq!(output.liquidations[0].excess_shares, dec!(5));
        let rows: Vec<_> = output.positions_for("PETR4").collect();
        assert!(rows[1].liquidated);
        assert_eq!(rows[1].shares, Decimal::ZERO);
        assert!(output.current.is_empty());
        assert_eq!(output.current.as_of_date, None);
    }

    #[test]
    fn test_missing_price_policies() {
        let mut prices = history();
        prices.add_trading_date(day(6));
        prices.insert(day(6), "VALE3", dec!(66));
        let txs = ledger();

        let marked = PortfolioEngine::default().compute(txs.clone(), &prices);
        assert_eq!(marked.data_gaps.len(), 1);
        assert_eq!(marked.data_gaps[0].instrument, "PETR4");
        assert_eq!(marked.totals_by_date.last().unwrap().total_market_value, MarketValue::Unknown);
        assert_eq!(marked.current.total_market_value, MarketValue::Unknown);

        let carried = PortfolioEngine::new(
            EngineSettings::default().with_missing_price_policy(MissingPricePolicy::CarryForward),
        )
        .compute(txs.clone(), &prices);
        assert!(carried.data_gaps.is_empty());
        // 60 * 32 + 10 * 66
        assert_eq!(
            carried.totals_by_date.last().unwrap().total_market_value,
            MarketValue::Known(dec!(2580))
        );

        let failed = PortfolioEngine::new(
            EngineSettings::default().with_missing_price_policy(MissingPricePolicy::Fail),
        )
        .compute(txs, &prices);
        assert_eq!(failed.failures.len(), 1);
        assert!(matches!(failed.failures[0].error, Error::DataGap(_)));
        assert!(failed.positions.iter().all(|p| p.instrument == "VALE3"));
    }

    fn carry_forward_engine() -> PortfolioEngine {
        PortfolioEngine::new(
            EngineSettings::default().with_missing_price_policy(MissingPricePolicy::CarryForward),
        )
    }

    fn sparse_history() -> PriceHistory {
        let mut prices = PriceHistory::new();
        prices.insert(day(2), "PETR4", dec!(10));
        prices.insert(day(2), "VALE3", dec!(20));
        prices.insert(day(4), "PETR4", dec!(20));
        prices.insert(day(4), "VALE3", dec!(20));
        prices
    }

    #[test]
    fn test_off_calendar_trade_keeps_other_holdings_in_totals() {
        let txs = vec![
            buy(0, 2, "PETR4", dec!(1), dec!(10)),
            buy(1, 2, "VALE3", dec!(1), dec!(20)),
            // The 3rd is not a trading day.
            buy(2, 3, "PETR4", dec!(1), dec!(10)),
        ];
        let output = carry_forward_engine().compute(txs, &sparse_history());

        let totals: Vec<(NaiveDate, MarketValue, usize)> = output
            .totals_by_date
            .iter()
            .map(|t| (t.date, t.total_market_value, t.instrument_count))
            .collect();
        assert_eq!(
            totals,
            vec![
                (day(2), MarketValue::Known(dec!(30)), 2),
                (day(3), MarketValue::Known(dec!(40)), 2),
                (day(4), MarketValue::Known(dec!(60)), 2),
            ]
        );

        let vale_third = output
            .positions_for("VALE3")
            .find(|p| p.date == day(3))
            .unwrap();
        assert_eq!(vale_third.row_kind, RowKind::Carry);
        assert_eq!(vale_third.price_date, Some(day(2)));
    }

    #[test]
    fn test_trade_after_last_trading_date_matches_snapshot_total() {
        let txs = vec![
            buy(0, 2, "PETR4", dec!(1), dec!(10)),
            buy(1, 2, "VALE3", dec!(1), dec!(20)),
            buy(2, 5, "PETR4", dec!(1), dec!(20)),
        ];
        let output = carry_forward_engine().compute(txs, &sparse_history());

        let as_of = output.current.as_of_date.unwrap();
        assert_eq!(as_of, day(5));
        let total = output.totals_by_date.iter().find(|t| t.date == as_of).unwrap();
        assert_eq!(total.instrument_count, 2);
        assert_eq!(total.total_market_value, output.current.total_market_value);
        // 2 * 20 + 1 * 20
        assert_eq!(output.current.total_market_value, MarketValue::Known(dec!(60)));
    }

    #[test]
    fn test_parallel_and_sequential_runs_match() {
        let parallel = PortfolioEngine::new(EngineSettings::default().with_parallel(true))
            .compute(ledger(), &history());
        let sequential = PortfolioEngine::new(EngineSettings::default().with_parallel(false))
            .compute(ledger(), &history());
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_run_propagates_source_errors() {
        let err = PortfolioEngine::default()
            .run(&FailingLedger, &history())
            .unwrap_err();
        assert!(matches!(err, Error::Source(SourceError::Io(_))));
    }

    #[test]
    fn test_run_with_in_memory_sources() {
        let output = PortfolioEngine::default().run(&ledger(), &history()).unwrap();
        assert_eq!(output, PortfolioEngine::default().compute(ledger(), &history()));
    }

    #[test]
    fn test_empty_ledger() {
        let output = PortfolioEngine::default().compute(Vec::new(), &history());
        assert!(output.positions.is_empty());
        assert!(output.totals_by_date.is_empty());
        assert!(output.current.is_empty());
    }
}
