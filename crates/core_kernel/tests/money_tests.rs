//! Unit tests for the Money module
//!
//! Tests cover creation, whole-unit rounding, increment rounding,
//! checked addition, and the grouped display format.

use core_kernel::{Money, Currency, MoneyError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::USD);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_whole_drops_fraction() {
        let m = Money::whole(dec!(272249.5), Currency::USD);
        assert_eq!(m.amount(), dec!(272250));
        assert!(m.is_whole());
    }

    #[test]
    fn test_try_from_f64_accepts_finite_values() {
        let m = Money::try_from_f64(25000.0, Currency::USD).unwrap();
        assert_eq!(m.amount(), dec!(25000));
    }

    #[test]
    fn test_try_from_f64_keeps_four_decimal_places() {
        let m = Money::try_from_f64(1234.567891, Currency::USD).unwrap();
        assert_eq!(m.amount(), dec!(1234.5679));
        assert!(!m.is_negative());
    }

    #[test]
    fn test_try_from_f64_rejects_non_finite_values() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                Money::try_from_f64(value, Currency::USD),
                Err(MoneyError::InvalidAmount(_))
            ));
        }
    }
}

mod rounding {
    use super::*;

    #[test]
    fn test_increment_of_one_is_whole_units() {
        let m = Money::new(dec!(163349.5), Currency::USD);
        assert_eq!(m.round_to_increment(Decimal::ONE).unwrap().amount(), dec!(163350));
    }

    #[test]
    fn test_increment_of_thousand() {
        let m = Money::new(dec!(487650), Currency::USD);
        assert_eq!(m.round_to_increment(dec!(1000)).unwrap().amount(), dec!(488000));
    }

    #[test]
    fn test_negative_increment_rejected() {
        let m = Money::new(dec!(10), Currency::USD);
        assert_eq!(
            m.round_to_increment(dec!(-1)),
            Err(MoneyError::InvalidIncrement(dec!(-1)))
        );
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_checked_add_same_currency() {
        let a = Money::new(dec!(100.00), Currency::USD);
        let b = Money::new(dec!(50.00), Currency::USD);
        assert_eq!(a.checked_add(&b).unwrap().amount(), dec!(150.00));
    }

    #[test]
    fn test_checked_add_currency_mismatch() {
        let a = Money::new(dec!(100.00), Currency::USD);
        let b = Money::new(dec!(50.00), Currency::EUR);
        assert!(matches!(a.checked_add(&b), Err(MoneyError::CurrencyMismatch(_, _))));
    }

    #[test]
    fn test_checked_add_overflow() {
        let a = Money::new(Decimal::MAX, Currency::USD);
        let b = Money::new(dec!(1), Currency::USD);
        assert_eq!(a.checked_add(&b), Err(MoneyError::Overflow));
    }

}

mod display {
    use super::*;

    #[test]
    fn test_display_string_groups_thousands() {
        let m = Money::whole(dec!(272250), Currency::USD);
        assert_eq!(m.to_display_string(), "$272,250");
    }

    #[test]
    fn test_display_string_rounds_fraction() {
        let m = Money::new(dec!(999.5), Currency::USD);
        assert_eq!(m.to_display_string(), "$1,000");
    }

    #[test]
    fn test_display_string_small_amount() {
        assert_eq!(Money::whole(dec!(0), Currency::USD).to_display_string(), "$0");
        assert_eq!(Money::whole(dec!(950), Currency::GBP).to_display_string(), "£950");
    }

    #[test]
    fn test_display_trait_uses_grouped_format_for_whole_amounts() {
        let m = Money::whole(dec!(1500000), Currency::CAD);
        assert_eq!(m.to_string(), "C$1,500,000");
    }

    #[test]
    fn test_serde_round_trip_keeps_currency_code() {
        let m = Money::whole(dec!(1000), Currency::USD);
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"USD\""));
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
