//! Payment plans
//!
//! A payment plan splits a matter's balance into scheduled installments.
//! Installment due dates are derived from the first payment date and the
//! plan frequency; invoices generated past the grace period carry a late
//! fee.

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use core_kernel::{ClientId, LawFirmId, MatterId, Money, PaymentPlanId, Rate};

/// Cadence of plan installments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanFrequency {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
}

impl PlanFrequency {
    /// Returns the due date of the nth installment (1-based)
    ///
    /// The first installment is due on `first_payment_date`; subsequent
    /// installments advance by the frequency. Month-based cadences clamp to
    /// the end of shorter months (Jan 31 -> Feb 28).
    pub fn nth_due_date(&self, first_payment_date: NaiveDate, installment: u32) -> NaiveDate {
        let offset = installment.saturating_sub(1);
        match self {
            PlanFrequency::Weekly => first_payment_date + Duration::weeks(offset as i64),
            PlanFrequency::Biweekly => first_payment_date + Duration::weeks(2 * offset as i64),
            PlanFrequency::Monthly => first_payment_date
                .checked_add_months(Months::new(offset))
                .unwrap_or(first_payment_date),
            PlanFrequency::Quarterly => first_payment_date
                .checked_add_months(Months::new(3 * offset))
                .unwrap_or(first_payment_date),
        }
    }
}

/// An installment payment plan for a matter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPlan {
    /// Unique identifier
    pub id: PaymentPlanId,
    /// Owning law firm
    pub law_firm_id: LawFirmId,
    /// Client paying the plan
    pub client_id: ClientId,
    /// Matter the plan settles
    pub matter_id: MatterId,
    /// Total amount covered by the plan
    pub total_amount: Money,
    /// Number of scheduled installments
    pub installment_count: u32,
    /// Amount of each installment
    pub installment_amount: Money,
    /// Installment cadence
    pub frequency: PlanFrequency,
    /// Due date of the first installment
    pub first_payment_date: NaiveDate,
    /// Days past due before a late fee applies
    pub grace_period_days: u32,
    /// Late fee as a percentage of the installment amount
    pub late_fee_rate: Rate,
    /// Whether a batch job should generate invoices automatically
    pub auto_generate_invoices: bool,
}

impl PaymentPlan {
    /// Returns the due date of the given installment (1-based)
    pub fn installment_due_date(&self, installment: u32) -> NaiveDate {
        self.frequency
            .nth_due_date(self.first_payment_date, installment)
    }

    /// Returns true if the installment number exists on this plan
    pub fn has_installment(&self, installment: u32) -> bool {
        installment >= 1 && installment <= self.installment_count
    }

    /// Returns true if an invoice generated on `as_of` for the installment
    /// is past the grace period
    pub fn is_late(&self, installment: u32, as_of: NaiveDate) -> bool {
        let due = self.installment_due_date(installment);
        as_of > due + Duration::days(self.grace_period_days as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly_plan(first: NaiveDate, grace_days: u32) -> PaymentPlan {
        PaymentPlan {
            id: PaymentPlanId::new(),
            law_firm_id: LawFirmId::new(),
            client_id: ClientId::new(),
            matter_id: MatterId::new(),
            total_amount: Money::new(dec!(10000), Currency::USD),
            installment_count: 4,
            installment_amount: Money::new(dec!(2500), Currency::USD),
            frequency: PlanFrequency::Monthly,
            first_payment_date: first,
            grace_period_days: grace_days,
            late_fee_rate: Rate::from_percentage(dec!(3)),
            auto_generate_invoices: false,
        }
    }

    #[test]
    fn test_monthly_due_dates_advance_by_month() {
        let plan = monthly_plan(date(2025, 1, 15), 5);
        assert_eq!(plan.installment_due_date(1), date(2025, 1, 15));
        assert_eq!(plan.installment_due_date(2), date(2025, 2, 15));
        assert_eq!(plan.installment_due_date(4), date(2025, 4, 15));
    }

    #[test]
    fn test_monthly_due_dates_clamp_to_short_months() {
        let plan = monthly_plan(date(2025, 1, 31), 5);
        assert_eq!(plan.installment_due_date(2), date(2025, 2, 28));
        assert_eq!(plan.installment_due_date(3), date(2025, 3, 31));
    }

    #[test]
    fn test_weekly_and_biweekly_due_dates() {
        assert_eq!(
            PlanFrequency::Weekly.nth_due_date(date(2025, 6, 2), 3),
            date(2025, 6, 16)
        );
        assert_eq!(
            PlanFrequency::Biweekly.nth_due_date(date(2025, 6, 2), 2),
            date(2025, 6, 16)
        );
    }

    #[test]
    fn test_has_installment_bounds() {
        let plan = monthly_plan(date(2025, 1, 15), 5);
        assert!(!plan.has_installment(0));
        assert!(plan.has_installment(1));
        assert!(plan.has_installment(4));
        assert!(!plan.has_installment(5));
    }

    #[test]
    fn test_late_only_past_grace_period() {
        let plan = monthly_plan(date(2025, 1, 15), 5);
        // Due Jan 15, grace through Jan 20
        assert!(!plan.is_late(1, date(2025, 1, 15)));
        assert!(!plan.is_late(1, date(2025, 1, 20)));
        assert!(plan.is_late(1, date(2025, 1, 21)));
        assert!(plan.is_late(1, date(2025, 1, 25)));
    }
}
