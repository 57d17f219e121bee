//! Rate calculations
//!
//! Pure charge computations shared by the invoice generators. Every result
//! is rounded to two decimal places with half-up rounding here, at the
//! point the charge is computed; invoice totals are sums of already-rounded
//! charges.

use rust_decimal::Decimal;

use core_kernel::{Currency, Money, MoneyError, Rate};

use crate::matter::CaseOutcome;
use crate::time_entry::TimeEntry;

/// Sums the billable amounts of chargeable time entries
///
/// Only entries that are billable and approved contribute; entries in other
/// statuses are excluded, not zeroed.
pub fn hourly_charge(entries: &[TimeEntry], currency: Currency) -> Result<Money, MoneyError> {
    let mut total = Money::zero(currency);
    for entry in entries.iter().filter(|e| e.is_chargeable()) {
        total = total.checked_add(&entry.billable_amount)?;
    }
    Ok(total.round_charge())
}

/// Computes a percentage-of-recovery charge plus the flat success fee
///
/// The success fee is additive; it is not part of the percentage base.
pub fn percentage_charge(outcome: &CaseOutcome, rate: Rate) -> Result<Money, MoneyError> {
    rate.apply(&outcome.amount_recovered)
        .round_charge()
        .checked_add(&outcome.success_fee)
}

/// Computes the hybrid charge: hourly time charges plus percentage of recovery
pub fn hybrid_charge(
    entries: &[TimeEntry],
    outcome: &CaseOutcome,
    rate: Rate,
    currency: Currency,
) -> Result<Money, MoneyError> {
    let hourly = hourly_charge(entries, currency)?;
    let percentage = percentage_charge(outcome, rate)?;
    hourly.checked_add(&percentage)
}

/// Raises a computed charge to the minimum fee when one is configured
pub fn apply_minimum_fee(
    computed: Money,
    minimum_fee: Option<Money>,
) -> Result<Money, MoneyError> {
    match minimum_fee {
        Some(minimum) => computed.checked_max(&minimum),
        None => Ok(computed),
    }
}

/// Computes the overage charge for usage beyond an included quantity
///
/// Usage at or below the inclusion is covered by the base fee; the charge
/// is never negative.
pub fn overage_charge(used: u32, included: u32, overage_rate: Money) -> Money {
    let excess = used.saturating_sub(included);
    overage_rate
        .multiply(Decimal::from(excess))
        .round_charge()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_kernel::{MatterId, TimeEntryId};
    use rust_decimal_macros::dec;

    use crate::time_entry::EntryStatus;

    fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    fn entry(amount: Decimal, is_billable: bool, status: EntryStatus) -> TimeEntry {
        TimeEntry {
            id: TimeEntryId::new(),
            matter_id: Some(MatterId::new()),
            subscription_id: None,
            service_type: None,
            entry_date: NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
            effective_minutes: 60,
            is_billable,
            billable_rate: usd(dec!(350)),
            billable_amount: usd(amount),
            status,
        }
    }

    fn outcome(recovered: Decimal, success_fee: Decimal) -> CaseOutcome {
        CaseOutcome {
            matter_id: MatterId::new(),
            amount_recovered: usd(recovered),
            success_fee: usd(success_fee),
            recorded_on: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        }
    }

    #[test]
    fn test_hourly_charge_sums_only_approved_billable() {
        let entries = vec![
            entry(dec!(700), true, EntryStatus::Approved),
            entry(dec!(525), true, EntryStatus::Approved),
            entry(dec!(350), true, EntryStatus::Submitted),
            entry(dec!(350), false, EntryStatus::Approved),
            entry(dec!(350), true, EntryStatus::Rejected),
        ];

        let charge = hourly_charge(&entries, Currency::USD).unwrap();
        assert_eq!(charge.amount(), dec!(1225.00));
    }

    #[test]
    fn test_hourly_charge_of_no_entries_is_zero() {
        let charge = hourly_charge(&[], Currency::USD).unwrap();
        assert!(charge.is_zero());
    }

    #[test]
    fn test_percentage_charge_adds_success_fee_outside_base() {
        // 30% of 50,000 plus a flat 2,000 success fee
        let charge = percentage_charge(&outcome(dec!(50000), dec!(2000)), Rate::from_percentage(dec!(30))).unwrap();
        assert_eq!(charge.amount(), dec!(17000.00));
    }

    #[test]
    fn test_percentage_charge_rounds_half_up() {
        // 33.335% of 100.05 = 33.3517... -> 33.35 before the fee
        let charge = percentage_charge(&outcome(dec!(100.05), dec!(0)), Rate::from_percentage(dec!(33.335))).unwrap();
        assert_eq!(charge.amount(), dec!(33.35));
    }

    #[test]
    fn test_hybrid_charge_combines_both_components() {
        let entries = vec![entry(dec!(1225), true, EntryStatus::Approved)];
        let charge = hybrid_charge(
            &entries,
            &outcome(dec!(10000), dec!(500)),
            Rate::from_percentage(dec!(10)),
            Currency::USD,
        )
        .unwrap();
        assert_eq!(charge.amount(), dec!(2725.00));
    }

    #[test]
    fn test_minimum_fee_raises_low_charges() {
        let raised = apply_minimum_fee(usd(dec!(1225)), Some(usd(dec!(2000)))).unwrap();
        assert_eq!(raised.amount(), dec!(2000));
    }

    #[test]
    fn test_minimum_fee_leaves_higher_charges_alone() {
        let kept = apply_minimum_fee(usd(dec!(3500)), Some(usd(dec!(2000)))).unwrap();
        assert_eq!(kept.amount(), dec!(3500));
    }

    #[test]
    fn test_no_minimum_fee_is_identity() {
        let kept = apply_minimum_fee(usd(dec!(1225)), None).unwrap();
        assert_eq!(kept.amount(), dec!(1225));
    }

    #[test]
    fn test_overage_charge_for_excess_usage() {
        let charge = overage_charge(8, 5, usd(dec!(200)));
        assert_eq!(charge.amount(), dec!(600.00));
    }

    #[test]
    fn test_overage_charge_is_zero_within_inclusion() {
        assert!(overage_charge(5, 5, usd(dec!(200))).is_zero());
        assert!(overage_charge(2, 5, usd(dec!(200))).is_zero());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    proptest! {
        #[test]
        fn overage_is_never_negative(
            used in 0u32..10_000u32,
            included in 0u32..10_000u32,
            rate_minor in 0i64..1_000_000i64
        ) {
            let rate = Money::from_minor(rate_minor, Currency::USD);
            let charge = overage_charge(used, included, rate);
            prop_assert!(!charge.is_negative());
            if used <= included {
                prop_assert!(charge.is_zero());
            }
        }

        #[test]
        fn minimum_fee_is_a_floor(
            computed_minor in 0i64..100_000_000i64,
            minimum_minor in 0i64..100_000_000i64
        ) {
            let computed = Money::from_minor(computed_minor, Currency::USD);
            let minimum = Money::from_minor(minimum_minor, Currency::USD);

            let floored = apply_minimum_fee(computed, Some(minimum)).unwrap();
            prop_assert!(floored.amount() >= minimum.amount());
            prop_assert!(floored.amount() >= computed.amount());
            prop_assert!(floored == computed || floored == minimum);

            let identity = apply_minimum_fee(computed, None).unwrap();
            prop_assert_eq!(identity, computed);
        }

        #[test]
        fn overage_scales_linearly_in_excess(
            included in 0u32..1_000u32,
            excess in 0u32..1_000u32
        ) {
            let rate = Money::new(dec!(200), Currency::USD);
            let charge = overage_charge(included + excess, included, rate);
            prop_assert_eq!(charge.amount(), dec!(200) * rust_decimal::Decimal::from(excess));
        }
    }
}
