//! Billing ports
//!
//! Generators depend on storage and number allocation abstractly through
//! these traits. The PostgreSQL adapter lives in `infra_db`; tests use the
//! in-memory fake from `test_utils`.

use async_trait::async_trait;
use chrono::NaiveDate;

use core_kernel::{MatterId, PaymentPlanId, PortError, SubscriptionId};
use core_kernel::ports::DomainPort;

use crate::invoice::{Invoice, SubjectKey};
use crate::matter::{CaseBillingConfig, CaseOutcome, Matter};
use crate::payment_plan::PaymentPlan;
use crate::subscription::Subscription;
use crate::time_entry::TimeEntry;

/// Filter for time entry queries
///
/// All set fields must match; `chargeable_only` restricts to billable,
/// approved entries.
#[derive(Debug, Clone, Default)]
pub struct TimeEntryFilter {
    pub matter_id: Option<MatterId>,
    pub subscription_id: Option<SubscriptionId>,
    pub service_type: Option<String>,
    /// Earliest entry date (inclusive)
    pub from: Option<NaiveDate>,
    /// Latest entry date (inclusive)
    pub to: Option<NaiveDate>,
    pub chargeable_only: bool,
}

impl TimeEntryFilter {
    /// Returns true if the entry matches every set criterion
    pub fn matches(&self, entry: &TimeEntry) -> bool {
        if let Some(matter_id) = self.matter_id {
            if entry.matter_id != Some(matter_id) {
                return false;
            }
        }
        if let Some(subscription_id) = self.subscription_id {
            if entry.subscription_id != Some(subscription_id) {
                return false;
            }
        }
        if let Some(service_type) = &self.service_type {
            if entry.service_type.as_deref() != Some(service_type.as_str()) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if entry.entry_date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if entry.entry_date > to {
                return false;
            }
        }
        if self.chargeable_only && !entry.is_chargeable() {
            return false;
        }
        true
    }
}

/// Storage port for billing subjects, line-item sources, and invoices
///
/// Absence is modeled as `Ok(None)`, not as a `PortError`: adapters reserve
/// errors for infrastructure failures, and the generators decide what a
/// missing entity means. `insert_invoice` must enforce the duplicate key as
/// a unique constraint and surface a violation as `PortError::Conflict`.
#[async_trait]
pub trait BillingStore: DomainPort {
    async fn get_subscription(
        &self,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, PortError>;

    async fn get_matter(&self, id: MatterId) -> Result<Option<Matter>, PortError>;

    async fn get_case_billing_config(
        &self,
        matter_id: MatterId,
    ) -> Result<Option<CaseBillingConfig>, PortError>;

    async fn get_time_entries(
        &self,
        filter: &TimeEntryFilter,
    ) -> Result<Vec<TimeEntry>, PortError>;

    async fn get_case_outcome(
        &self,
        matter_id: MatterId,
    ) -> Result<Option<CaseOutcome>, PortError>;

    async fn get_payment_plan(
        &self,
        id: PaymentPlanId,
    ) -> Result<Option<PaymentPlan>, PortError>;

    /// Fast-path duplicate check on the subject key
    async fn find_invoice(&self, key: &SubjectKey) -> Result<Option<Invoice>, PortError>;

    /// Installment numbers of this plan that already have invoices
    async fn billed_installments(
        &self,
        payment_plan_id: PaymentPlanId,
    ) -> Result<Vec<u32>, PortError>;

    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), PortError>;
}

/// Allocates unique, sequential, type-prefixed invoice numbers
///
/// Numbers are formatted `{PREFIX}-{YYYY}-{6-digit sequence}` and are
/// monotonically increasing per (prefix, year).
#[async_trait]
pub trait InvoiceNumberAllocator: DomainPort {
    async fn next_number(&self, prefix: &str, year: i32) -> Result<String, PortError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{Currency, Money, TimeEntryId};
    use rust_decimal_macros::dec;

    use crate::time_entry::EntryStatus;

    fn entry() -> TimeEntry {
        TimeEntry {
            id: TimeEntryId::new(),
            matter_id: Some(MatterId::new()),
            subscription_id: Some(SubscriptionId::new()),
            service_type: Some("legal_consultation".to_string()),
            entry_date: NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
            effective_minutes: 30,
            is_billable: true,
            billable_rate: Money::new(dec!(350), Currency::USD),
            billable_amount: Money::new(dec!(175), Currency::USD),
            status: EntryStatus::Approved,
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(TimeEntryFilter::default().matches(&entry()));
    }

    #[test]
    fn test_filter_by_service_type() {
        let e = entry();
        let mut filter = TimeEntryFilter {
            service_type: Some("legal_consultation".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&e));

        filter.service_type = Some("document_review".to_string());
        assert!(!filter.matches(&e));
    }

    #[test]
    fn test_filter_by_date_range() {
        let e = entry();
        let filter = TimeEntryFilter {
            from: Some(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()),
            to: Some(NaiveDate::from_ymd_opt(2025, 5, 31).unwrap()),
            ..Default::default()
        };
        assert!(filter.matches(&e));

        let filter = TimeEntryFilter {
            from: Some(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()),
            ..Default::default()
        };
        assert!(!filter.matches(&e));
    }

    #[test]
    fn test_chargeable_only_excludes_unapproved() {
        let mut e = entry();
        e.status = EntryStatus::Submitted;

        let filter = TimeEntryFilter {
            chargeable_only: true,
            ..Default::default()
        };
        assert!(!filter.matches(&e));
        assert!(TimeEntryFilter::default().matches(&e));
    }
}
