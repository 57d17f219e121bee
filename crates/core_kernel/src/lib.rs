//! Core Kernel - Foundational types and utilities for the legal billing system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - An injectable clock for deterministic date handling
//! - Common identifiers and value objects
//! - The shared error type for persistence ports

pub mod money;
pub mod clock;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, Rate, MoneyError};
pub use clock::{Clock, SystemClock};
pub use identifiers::{
    LawFirmId, ClientId, SubscriptionId, MatterId,
    PaymentPlanId, InvoiceId, TimeEntryId,
};
pub use ports::PortError;
