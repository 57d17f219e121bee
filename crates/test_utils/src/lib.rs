//! Test utilities for the billing test suite
//!
//! Provides builders with sensible defaults for billing subjects and time
//! entries, an in-memory [`domain_billing::BillingStore`] fake that
//! enforces the duplicate unique key the way the database constraint
//! would, a deterministic clock, and a sequence-backed invoice number
//! allocator.

pub mod builders;
pub mod fixtures;
pub mod memory;

pub use builders::{
    MatterBuilder, PaymentPlanBuilder, SubscriptionBuilder, TimeEntryBuilder,
};
pub use fixtures::{usd, FixedClock};
pub use memory::{InMemoryBillingStore, SequenceNumberAllocator};
