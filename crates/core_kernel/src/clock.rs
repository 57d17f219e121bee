//! Injectable clock
//!
//! Proration and late-fee decisions depend on "today". Generators take a
//! `Clock` rather than reading the ambient system time so that tests can
//! pin the date deterministically.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current time for billing decisions
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current calendar date in UTC
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
