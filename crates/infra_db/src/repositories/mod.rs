//! Repository implementations
//!
//! PostgreSQL-backed implementations of the billing ports.

pub mod billing;

pub use billing::{PgBillingStore, PgInvoiceNumberAllocator};
