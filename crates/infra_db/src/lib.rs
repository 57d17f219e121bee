//! Infrastructure Database Layer
//!
//! PostgreSQL implementations of the billing ports defined in
//! `domain_billing`, plus pool and settings management.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: `PgBillingStore` and
//! `PgInvoiceNumberAllocator` implement the domain's port traits and hide
//! every SQL detail from the generators. Database errors are translated to
//! `PortError` at the adapter boundary, so domain code never sees SQLx
//! types.
//!
//! The duplicate guard relies on unique indexes over the invoice subject
//! key (see `migrations/`); `insert_invoice` surfaces a violation as
//! `PortError::Conflict`.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{DatabaseConfig, create_pool, PgBillingStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/billing")).await?;
//! let store = PgBillingStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod settings;
pub mod repositories;

pub use pool::{DatabasePool, create_pool, create_pool_from_url, DatabaseConfig};
pub use error::DatabaseError;
pub use settings::DbSettings;
pub use repositories::{PgBillingStore, PgInvoiceNumberAllocator};
