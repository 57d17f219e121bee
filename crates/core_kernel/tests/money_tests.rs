//! Integration tests for money and rate types

use rust_decimal_macros::dec;

use core_kernel::{Currency, Money, MoneyError, Rate};

mod money_tests {
    use super::*;

    #[test]
    fn test_zero_is_zero() {
        let zero = Money::zero(Currency::USD);
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
    }

    #[test]
    fn test_sign_predicates() {
        let positive = Money::new(dec!(350.00), Currency::USD);
        assert!(positive.is_positive());
        assert!(!positive.is_negative());

        let negative = -positive;
        assert!(negative.is_negative());
        assert!(!negative.is_positive());
    }

    #[test]
    fn test_multiply_keeps_precision_until_rounded() {
        // 3 overage units at 66.665 each: exact product carried at 4dp,
        // charge rounding happens once at the end.
        let rate = Money::new(dec!(66.665), Currency::USD);
        let gross = rate.multiply(dec!(3));
        assert_eq!(gross.amount(), dec!(199.995));
        assert_eq!(gross.round_charge().amount(), dec!(200.00));
    }

    #[test]
    fn test_divide_by_zero_is_an_error() {
        let m = Money::new(dec!(100.00), Currency::USD);
        assert_eq!(m.divide(dec!(0)), Err(MoneyError::DivisionByZero));
    }

    #[test]
    fn test_display_formats_currency() {
        let m = Money::new(dec!(2500.75), Currency::USD);
        assert_eq!(m.to_string(), "$ 2500.75");
    }

    #[test]
    fn test_checked_ops_reject_mixed_currencies() {
        let usd = Money::new(dec!(10.00), Currency::USD);
        let gbp = Money::new(dec!(10.00), Currency::GBP);

        assert!(usd.checked_add(&gbp).is_err());
        assert!(usd.checked_sub(&gbp).is_err());
        assert!(usd.checked_max(&gbp).is_err());
    }
}

mod rate_tests {
    use super::*;

    #[test]
    fn test_rate_round_trip() {
        let rate = Rate::from_percentage(dec!(3));
        assert_eq!(rate.as_decimal(), dec!(0.03));
        assert_eq!(rate.as_percentage(), dec!(3));
    }

    #[test]
    fn test_late_fee_rate_application() {
        let rate = Rate::from_percentage(dec!(3));
        let installment = Money::new(dec!(2500.00), Currency::USD);
        assert_eq!(rate.apply(&installment).amount(), dec!(75.00));
    }

    #[test]
    fn test_rate_display_shows_percent() {
        let rate = Rate::from_percentage(dec!(30));
        assert!(rate.to_string().ends_with('%'));
    }
}
