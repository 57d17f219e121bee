//! Billing period value object
//!
//! A billing period is a closed date range: both boundaries are inclusive,
//! so a calendar month of January spans 31 days. Proration day counts use
//! this convention.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors related to billing periods
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    #[error("Invalid calendar month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

/// A closed date range covered by one invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillingPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl BillingPeriod {
    /// Creates a new billing period
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a period covering one calendar month
    pub fn calendar_month(year: i32, month: u32) -> Result<Self, PeriodError> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(PeriodError::InvalidMonth { year, month })?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or(PeriodError::InvalidMonth { year, month })?;

        Self::new(start, next_month - Duration::days(1))
    }

    /// Returns the first day of the period (inclusive)
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the last day of the period (inclusive)
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns the number of days in the period, counting both boundaries
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Returns true if the date falls within the period
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Returns the calendar year of the period start
    ///
    /// Invoice numbers are sequenced per (prefix, year) using this year.
    pub fn year(&self) -> i32 {
        self.start.year()
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_rejects_inverted_range() {
        let result = BillingPeriod::new(date(2025, 2, 1), date(2025, 1, 1));
        assert!(matches!(result, Err(PeriodError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_single_day_period_has_one_day() {
        let period = BillingPeriod::new(date(2025, 3, 15), date(2025, 3, 15)).unwrap();
        assert_eq!(period.days(), 1);
    }

    #[test]
    fn test_calendar_month_boundaries() {
        let jan = BillingPeriod::calendar_month(2025, 1).unwrap();
        assert_eq!(jan.start(), date(2025, 1, 1));
        assert_eq!(jan.end(), date(2025, 1, 31));
        assert_eq!(jan.days(), 31);

        let dec = BillingPeriod::calendar_month(2024, 12).unwrap();
        assert_eq!(dec.end(), date(2024, 12, 31));

        let feb_leap = BillingPeriod::calendar_month(2024, 2).unwrap();
        assert_eq!(feb_leap.days(), 29);
    }

    #[test]
    fn test_contains_is_inclusive_on_both_ends() {
        let period = BillingPeriod::calendar_month(2025, 6).unwrap();
        assert!(period.contains(date(2025, 6, 1)));
        assert!(period.contains(date(2025, 6, 30)));
        assert!(!period.contains(date(2025, 5, 31)));
        assert!(!period.contains(date(2025, 7, 1)));
    }
}
