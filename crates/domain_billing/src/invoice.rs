//! Invoices
//!
//! The engine's sole output entity. An invoice is created once, in draft
//! status; later status transitions belong to the billing workflow, and
//! regeneration for an already-invoiced period or installment is a caller
//! error, never an update.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClientId, InvoiceId, LawFirmId, MatterId, Money, PaymentPlanId, SubscriptionId};

use crate::period::BillingPeriod;

/// Invoice status
///
/// Generators only ever produce `Draft`; the remaining states are owned by
/// the downstream billing workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

/// Which kind of billing produced an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceType {
    Subscription,
    CaseBilling,
    PaymentPlan,
}

impl InvoiceType {
    /// Returns the invoice number prefix for this type
    pub fn number_prefix(&self) -> &'static str {
        match self {
            InvoiceType::Subscription => "SUB",
            InvoiceType::CaseBilling => "CASE",
            InvoiceType::PaymentPlan => "PLAN",
        }
    }
}

/// The billing subject an invoice was generated from
///
/// Exactly one subject reference exists per invoice and it always matches
/// the invoice type; the sum type makes that invariant structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvoiceSource {
    Subscription {
        subscription_id: SubscriptionId,
        period: BillingPeriod,
    },
    Matter {
        matter_id: MatterId,
    },
    PaymentPlan {
        payment_plan_id: PaymentPlanId,
        installment: u32,
    },
}

impl InvoiceSource {
    /// Returns the invoice type implied by this source
    pub fn invoice_type(&self) -> InvoiceType {
        match self {
            InvoiceSource::Subscription { .. } => InvoiceType::Subscription,
            InvoiceSource::Matter { .. } => InvoiceType::CaseBilling,
            InvoiceSource::PaymentPlan { .. } => InvoiceType::PaymentPlan,
        }
    }

    /// Returns the duplicate-guard key for this source, if one applies
    ///
    /// Subscription periods and plan installments are invoiced at most
    /// once. Case invoices have no key: a repeat request for a matter is an
    /// explicit re-request.
    pub fn subject_key(&self) -> Option<SubjectKey> {
        match *self {
            InvoiceSource::Subscription {
                subscription_id,
                period,
            } => Some(SubjectKey::SubscriptionPeriod {
                subscription_id,
                period,
            }),
            InvoiceSource::Matter { .. } => None,
            InvoiceSource::PaymentPlan {
                payment_plan_id,
                installment,
            } => Some(SubjectKey::PlanInstallment {
                payment_plan_id,
                installment,
            }),
        }
    }
}

/// Uniqueness key enforced by the duplicate guard
///
/// The read-side `find_invoice` check on this key is a fast path; the
/// storage layer's unique constraint on the same key is the correctness
/// backstop under concurrent generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectKey {
    SubscriptionPeriod {
        subscription_id: SubscriptionId,
        period: BillingPeriod,
    },
    PlanInstallment {
        payment_plan_id: PaymentPlanId,
        installment: u32,
    },
}

impl std::fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectKey::SubscriptionPeriod {
                subscription_id,
                period,
            } => write!(f, "subscription {} for {}", subscription_id, period),
            SubjectKey::PlanInstallment {
                payment_plan_id,
                installment,
            } => write!(f, "plan {} installment {}", payment_plan_id, installment),
        }
    }
}

/// An invoice produced by one of the generators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    /// Owning law firm
    pub law_firm_id: LawFirmId,
    /// Billed client
    pub client_id: ClientId,
    /// Allocated invoice number (e.g., "SUB-2025-000001")
    pub invoice_number: String,
    /// Billing subject the invoice was generated from
    pub source: InvoiceSource,
    /// Status, always `Draft` at creation
    pub status: InvoiceStatus,
    /// Date the invoice was issued
    pub issue_date: NaiveDate,
    /// Date payment is due
    pub due_date: NaiveDate,
    /// Sum of charges before tax and discount
    pub subtotal: Money,
    /// Tax amount
    pub tax_amount: Money,
    /// Discount amount
    pub discount_amount: Money,
    /// subtotal + tax - discount
    pub total_amount: Money,
    /// Days from issue to due date
    pub payment_terms_days: u32,
    /// Operator-facing description of what was billed
    pub description: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates a draft invoice with no tax or discount
    ///
    /// The total equals the subtotal; `with_tax` and `with_discount`
    /// recompute it.
    #[allow(clippy::too_many_arguments)]
    pub fn draft(
        law_firm_id: LawFirmId,
        client_id: ClientId,
        invoice_number: String,
        source: InvoiceSource,
        issue_date: NaiveDate,
        payment_terms_days: u32,
        due_date: NaiveDate,
        subtotal: Money,
        description: String,
        now: DateTime<Utc>,
    ) -> Self {
        let currency = subtotal.currency();
        Self {
            id: InvoiceId::new_v7(),
            law_firm_id,
            client_id,
            invoice_number,
            source,
            status: InvoiceStatus::Draft,
            issue_date,
            due_date,
            subtotal,
            tax_amount: Money::zero(currency),
            discount_amount: Money::zero(currency),
            total_amount: subtotal,
            payment_terms_days,
            description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the tax amount and recomputes the total
    pub fn with_tax(mut self, tax: Money) -> Self {
        self.tax_amount = tax;
        self.recalculate_total();
        self
    }

    /// Sets the discount amount and recomputes the total
    pub fn with_discount(mut self, discount: Money) -> Self {
        self.discount_amount = discount;
        self.recalculate_total();
        self
    }

    /// Returns the invoice type implied by the source
    pub fn invoice_type(&self) -> InvoiceType {
        self.source.invoice_type()
    }

    /// Returns the duplicate-guard key, if the source carries one
    pub fn subject_key(&self) -> Option<SubjectKey> {
        self.source.subject_key()
    }

    /// Checks the total identity: total = subtotal + tax - discount, >= 0
    pub fn total_is_consistent(&self) -> bool {
        let expected = self.subtotal.amount() + self.tax_amount.amount()
            - self.discount_amount.amount();
        self.total_amount.amount() == expected && !self.total_amount.is_negative()
    }

    fn recalculate_total(&mut self) {
        self.total_amount = Money::new(
            self.subtotal.amount() + self.tax_amount.amount() - self.discount_amount.amount(),
            self.subtotal.currency(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn draft_invoice(subtotal: Money) -> Invoice {
        let issue = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        Invoice::draft(
            LawFirmId::new(),
            ClientId::new(),
            "CASE-2025-000001".to_string(),
            InvoiceSource::Matter {
                matter_id: MatterId::new(),
            },
            issue,
            30,
            issue + chrono::Duration::days(30),
            subtotal,
            "Legal services".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn test_draft_starts_with_total_equal_to_subtotal() {
        let invoice = draft_invoice(Money::new(dec!(2000), Currency::USD));

        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert_eq!(invoice.total_amount, invoice.subtotal);
        assert!(invoice.tax_amount.is_zero());
        assert!(invoice.discount_amount.is_zero());
        assert!(invoice.total_is_consistent());
    }

    #[test]
    fn test_tax_and_discount_recompute_total() {
        let invoice = draft_invoice(Money::new(dec!(1000), Currency::USD))
            .with_tax(Money::new(dec!(80), Currency::USD))
            .with_discount(Money::new(dec!(50), Currency::USD));

        assert_eq!(invoice.total_amount.amount(), dec!(1030));
        assert!(invoice.total_is_consistent());
    }

    #[test]
    fn test_source_implies_type_and_key() {
        let subscription_id = SubscriptionId::new();
        let period = BillingPeriod::calendar_month(2025, 4).unwrap();
        let source = InvoiceSource::Subscription {
            subscription_id,
            period,
        };

        assert_eq!(source.invoice_type(), InvoiceType::Subscription);
        assert_eq!(
            source.subject_key(),
            Some(SubjectKey::SubscriptionPeriod {
                subscription_id,
                period
            })
        );

        let matter_source = InvoiceSource::Matter {
            matter_id: MatterId::new(),
        };
        assert_eq!(matter_source.invoice_type(), InvoiceType::CaseBilling);
        assert!(matter_source.subject_key().is_none());
    }

    #[test]
    fn test_number_prefixes() {
        assert_eq!(InvoiceType::Subscription.number_prefix(), "SUB");
        assert_eq!(InvoiceType::CaseBilling.number_prefix(), "CASE");
        assert_eq!(InvoiceType::PaymentPlan.number_prefix(), "PLAN");
    }
}
