//! Common fixtures
//!
//! Small helpers shared across tests: money shorthand and a clock pinned
//! to a known instant.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use core_kernel::{Clock, Currency, Money};

/// USD money shorthand
pub fn usd(amount: Decimal) -> Money {
    Money::new(amount, Currency::USD)
}

/// A clock frozen at a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Pins the clock to noon UTC on the given date
    pub fn on(date: NaiveDate) -> Self {
        let now = Utc
            .from_utc_datetime(&date.and_hms_opt(12, 0, 0).expect("valid time"));
        Self { now }
    }

    /// Pins the clock to noon UTC on the given calendar day
    pub fn on_ymd(year: i32, month: u32, day: u32) -> Self {
        Self::on(NaiveDate::from_ymd_opt(year, month, day).expect("valid date"))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
