//! Billing Domain - Invoice Generation Engine
//!
//! This crate implements invoice generation for a legal practice in three
//! billing modes sharing one contract:
//!
//! - **Subscription billing**: one invoice per subscription per billing
//!   period, combining a (possibly prorated) base fee with metered usage
//!   overage beyond each service inclusion.
//! - **Case billing**: one invoice per matter billing request, dispatching
//!   on the matter's fee model (hourly, fixed, percentage, contingency,
//!   hybrid, retainer) with a minimum-fee floor.
//! - **Payment-plan billing**: one invoice per installment, applying a late
//!   fee when generated past the plan's grace period.
//!
//! Generators load their billing subject and line-item sources through the
//! [`ports::BillingStore`] trait, allocate invoice numbers through
//! [`ports::InvoiceNumberAllocator`], and read "today" from an injected
//! [`core_kernel::Clock`]. Every generator returns a typed
//! [`GenerationError`] for expected failures; it never mutates an existing
//! invoice, and a second request for an already-invoiced period or
//! installment fails with [`GenerationError::DuplicateInvoice`].
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{SubscriptionInvoiceGenerator, SubscriptionInvoiceRequest};
//!
//! let generator = SubscriptionInvoiceGenerator::new(store, numbers, clock);
//! let invoice = generator
//!     .generate(SubscriptionInvoiceRequest {
//!         law_firm_id,
//!         subscription_id,
//!         period,
//!     })
//!     .await?;
//! ```

pub mod period;
pub mod subscription;
pub mod matter;
pub mod time_entry;
pub mod payment_plan;
pub mod rates;
pub mod proration;
pub mod invoice;
pub mod ports;
pub mod error;
pub mod subscription_invoices;
pub mod case_invoices;
pub mod plan_invoices;

pub use period::{BillingPeriod, PeriodError};
pub use subscription::{Subscription, ServiceInclusion, BillingCycle};
pub use matter::{Matter, CaseBillingConfig, BillingMethod, CaseOutcome};
pub use time_entry::{TimeEntry, EntryStatus};
pub use payment_plan::{PaymentPlan, PlanFrequency};
pub use invoice::{Invoice, InvoiceSource, InvoiceStatus, InvoiceType, SubjectKey};
pub use ports::{BillingStore, InvoiceNumberAllocator, TimeEntryFilter};
pub use error::GenerationError;
pub use subscription_invoices::{SubscriptionInvoiceGenerator, SubscriptionInvoiceRequest};
pub use case_invoices::{CaseInvoiceGenerator, CaseInvoiceRequest};
pub use plan_invoices::{
    PaymentPlanInvoiceGenerator, PlanInvoiceRequest, BatchResult, InstallmentResult,
};
