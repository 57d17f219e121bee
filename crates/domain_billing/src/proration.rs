//! Proration
//!
//! Computes the fractional monthly fee for a billing period that a
//! subscription only partially covers. Day counts are inclusive on both
//! period boundaries; the result is rounded to two decimal places half-up.

use rust_decimal::Decimal;

use core_kernel::Money;

use crate::period::BillingPeriod;
use chrono::NaiveDate;

/// Computes the prorated monthly fee for a period
///
/// Returns the full fee when the subject started on or before the period
/// start, and zero when the subject starts after the period ends (the
/// generator rejects that request rather than emitting a zero invoice).
/// Otherwise charges the fraction of period days on or after the start
/// date.
pub fn prorated_monthly_fee(
    period: &BillingPeriod,
    subject_start: NaiveDate,
    monthly_fee: Money,
) -> Money {
    if subject_start <= period.start() {
        return monthly_fee;
    }
    if subject_start > period.end() {
        return Money::zero(monthly_fee.currency());
    }

    let covered_days = (period.end() - subject_start).num_days() + 1;
    let fraction = Decimal::from(covered_days) / Decimal::from(period.days());
    monthly_fee.multiply(fraction).round_charge()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    #[test]
    fn test_full_fee_when_started_before_period() {
        let period = BillingPeriod::calendar_month(2025, 3).unwrap();
        let fee = prorated_monthly_fee(&period, date(2025, 1, 1), usd(dec!(1500)));
        assert_eq!(fee.amount(), dec!(1500));
    }

    #[test]
    fn test_full_fee_when_started_on_period_start() {
        let period = BillingPeriod::calendar_month(2025, 3).unwrap();
        let fee = prorated_monthly_fee(&period, date(2025, 3, 1), usd(dec!(1500)));
        assert_eq!(fee.amount(), dec!(1500));
    }

    #[test]
    fn test_mid_month_start_charges_covered_fraction() {
        // 30-day June, start on the 16th: 15 of 30 days covered
        let period = BillingPeriod::calendar_month(2025, 6).unwrap();
        let fee = prorated_monthly_fee(&period, date(2025, 6, 16), usd(dec!(3000)));
        assert_eq!(fee.amount(), dec!(1500.00));
    }

    #[test]
    fn test_last_day_start_charges_one_day() {
        let period = BillingPeriod::calendar_month(2025, 6).unwrap();
        let fee = prorated_monthly_fee(&period, date(2025, 6, 30), usd(dec!(3000)));
        assert_eq!(fee.amount(), dec!(100.00));
    }

    #[test]
    fn test_rounding_is_half_up() {
        // 31-day period, 1 day covered: 1500 / 31 = 48.387... -> 48.39
        let period = BillingPeriod::calendar_month(2025, 1).unwrap();
        let fee = prorated_monthly_fee(&period, date(2025, 1, 31), usd(dec!(1500)));
        assert_eq!(fee.amount(), dec!(48.39));
    }

    #[test]
    fn test_start_after_period_charges_zero() {
        let period = BillingPeriod::calendar_month(2025, 3).unwrap();
        let fee = prorated_monthly_fee(&period, date(2025, 4, 2), usd(dec!(1500)));
        assert!(fee.is_zero());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::Duration;
    use core_kernel::Currency;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    proptest! {
        #[test]
        fn proration_never_exceeds_monthly_fee(offset_days in 0i64..60i64) {
            let period = BillingPeriod::calendar_month(2025, 7).unwrap();
            let start = period.start() + Duration::days(offset_days);
            let fee = Money::new(dec!(1500), Currency::USD);

            let charge = prorated_monthly_fee(&period, start, fee);
            prop_assert!(charge.amount() <= fee.amount());
            prop_assert!(!charge.is_negative());
        }

        #[test]
        fn proration_is_monotone_in_coverage(offset_days in 1i64..30i64) {
            // Starting one day earlier never decreases the charge.
            let period = BillingPeriod::calendar_month(2025, 7).unwrap();
            let fee = Money::new(dec!(1500), Currency::USD);

            let later = period.start() + Duration::days(offset_days);
            let earlier = later - Duration::days(1);

            let charge_later = prorated_monthly_fee(&period, later, fee);
            let charge_earlier = prorated_monthly_fee(&period, earlier, fee);
            prop_assert!(charge_earlier.amount() >= charge_later.amount());
        }
    }
}
