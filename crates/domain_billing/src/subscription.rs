//! Client subscriptions
//!
//! A subscription entitles a client to a bundle of included services for a
//! recurring monthly fee. Usage beyond an inclusion's quantity is billed as
//! overage at the inclusion's own rate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{ClientId, LawFirmId, Money, SubscriptionId};

use crate::period::BillingPeriod;

/// Recurring billing cadence of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Monthly,
    Quarterly,
    Annual,
}

/// A bundled service with an included quantity and an overage rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInclusion {
    /// Service type tag matched against time entries (e.g., "legal_consultation")
    pub service_type: String,
    /// Quantity covered by the base fee per period
    pub quantity_included: u32,
    /// Unit of the included quantity (e.g., "sessions", "documents")
    pub unit: String,
    /// Rate charged per unit beyond the included quantity
    pub overage_rate: Money,
}

impl ServiceInclusion {
    pub fn new(
        service_type: impl Into<String>,
        quantity_included: u32,
        unit: impl Into<String>,
        overage_rate: Money,
    ) -> Self {
        Self {
            service_type: service_type.into(),
            quantity_included,
            unit: unit.into(),
            overage_rate,
        }
    }
}

/// A client's service subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique identifier
    pub id: SubscriptionId,
    /// Owning law firm
    pub law_firm_id: LawFirmId,
    /// Subscribed client
    pub client_id: ClientId,
    /// First day the subscription is active
    pub start_date: NaiveDate,
    /// Base fee per month
    pub monthly_fee: Money,
    /// Billing cadence
    pub billing_cycle: BillingCycle,
    /// Services bundled into the base fee
    pub inclusions: Vec<ServiceInclusion>,
}

impl Subscription {
    /// Returns true if the subscription is active at some point in the period
    ///
    /// A subscription starting after the period's last day is not active in
    /// it; generating an invoice for such a period is a caller error, not a
    /// zero invoice.
    pub fn is_active_in(&self, period: &BillingPeriod) -> bool {
        self.start_date <= period.end()
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

    fn subscription_starting(start: NaiveDate) -> Subscription {
        Subscription {
            id: SubscriptionId::new(),
            law_firm_id: LawFirmId::new(),
            client_id: ClientId::new(),
            start_date: start,
            monthly_fee: Money::new(dec!(1500), Currency::USD),
            billing_cycle: BillingCycle::Monthly,
            inclusions: vec![],
        }
    }

    #[test]
    fn test_active_when_started_before_period() {
        let period = BillingPeriod::calendar_month(2025, 3).unwrap();
        let sub = subscription_starting(date(2025, 1, 1));
        assert!(sub.is_active_in(&period));
    }

    #[test]
    fn test_active_when_started_mid_period() {
        let period = BillingPeriod::calendar_month(2025, 3).unwrap();
        let sub = subscription_starting(date(2025, 3, 16));
        assert!(sub.is_active_in(&period));
    }

    #[test]
    fn test_not_active_when_started_after_period() {
        let period = BillingPeriod::calendar_month(2025, 3).unwrap();
        let sub = subscription_starting(date(2025, 4, 1));
        assert!(!sub.is_active_in(&period));
    }
}
