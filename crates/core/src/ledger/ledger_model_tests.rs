#[cfg(test)]
mod tests {
    use crate::errors::ValidationError;
    use crate::ledger::{Transaction, TransactionAction};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn buy() -> Transaction {
        Transaction::trade(0, day(2), "ITSA4", TransactionAction::Buy, dec!(10), dec!(10))
    }

    #[test]
    fn test_action_parsing_is_case_insensitive() {
        assert_eq!(TransactionAction::from_str("BUY").unwrap(), TransactionAction::Buy);
        assert_eq!(TransactionAction::from_str(" sell ").unwrap(), TransactionAction::Sell);
        assert!(TransactionAction::from_str("SPLIT").is_err());
        assert!(TransactionAction::from_str("").is_err());
    }

    #[test]
    fn test_action_serialization() {
        assert_eq!(serde_json::to_string(&TransactionAction::Buy).unwrap(), "\"BUY\"");
        assert_eq!(
            serde_json::from_str::<TransactionAction>("\"SELL\"").unwrap(),
            TransactionAction::Sell
        );
    }

    #[test]
    fn test_trade_constructor() {
        let tx = buy().with_fees(dec!(0.25), dec!(0.75));
        assert_eq!(tx.transaction_value, dec!(100));
        assert_eq!(tx.total_fees(), dec!(1));
        assert_eq!(tx.action, "BUY");
    }

    #[test]
    fn test_validate_accepts_well_formed_record() {
        assert_eq!(buy().validate().unwrap(), TransactionAction::Buy);
    }

    #[test]
    fn test_validate_rejects_unknown_action() {
        let mut tx = buy();
        tx.action = "DIVIDEND".to_string();
        match tx.validate().unwrap_err() {
            ValidationError::UnknownAction { action, record } => {
                assert_eq!(action, "DIVIDEND");
                assert_eq!(record.instrument, "ITSA4");
                assert_eq!(record.date, day(2));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_non_positive_shares() {
        let mut tx = buy();
        tx.shares = Decimal::ZERO;
        assert!(matches!(
            tx.validate(),
            Err(ValidationError::NonPositiveShares { .. })
        ));
        tx.shares = dec!(-3);
        assert!(matches!(
            tx.validate(),
            Err(ValidationError::NonPositiveShares { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_fractional_shares() {
        let mut tx = buy();
        tx.shares = dec!(1.5);
        match tx.validate().unwrap_err() {
            ValidationError::FractionalShares { shares, record } => {
                assert_eq!(shares, "1.5");
                assert_eq!(record.sequence, tx.sequence);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        tx.shares = dec!(2.000);
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_amounts() {
        let mut tx = buy();
        tx.fees = dec!(-0.01);
        match tx.validate().unwrap_err() {
            ValidationError::NegativeAmount { field, value, .. } => {
                assert_eq!(field, "fees");
                assert_eq!(value, "-0.01");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let mut tx = buy();
        tx.transaction_value = dec!(-100);
        assert!(matches!(
            tx.validate(),
            Err(ValidationError::NegativeAmount { field: "transactionValue", .. })
        ));
    }

    #[test]
    fn test_zero_fees_and_value_are_valid() {
        let tx = Transaction::trade(0, day(2), "ITSA4", TransactionAction::Buy, dec!(1), Decimal::ZERO);
        assert!(tx.validate().is_ok());
    }
}
