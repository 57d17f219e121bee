//! Time entries
//!
//! Time entries are the line-item source for hourly case charges and, when
//! tagged to a subscription and service type, the usage records metered
//! against service inclusions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{MatterId, Money, SubscriptionId, TimeEntryId};

/// Workflow status of a time entry
///
/// Only approved entries are ever charged; entries in other statuses are
/// excluded from calculations, not zeroed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

/// A recorded unit of work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Unique identifier
    pub id: TimeEntryId,
    /// Matter the work was done for, if any
    pub matter_id: Option<MatterId>,
    /// Subscription the work counts against, if any
    pub subscription_id: Option<SubscriptionId>,
    /// Service type tag used for inclusion metering
    pub service_type: Option<String>,
    /// Date the work was performed
    pub entry_date: NaiveDate,
    /// Billable duration in minutes after adjustments
    pub effective_minutes: u32,
    /// Whether the entry is billable at all
    pub is_billable: bool,
    /// Rate the entry was recorded at
    pub billable_rate: Money,
    /// Charge amount for the entry
    pub billable_amount: Money,
    /// Workflow status
    pub status: EntryStatus,
}

impl TimeEntry {
    /// Returns true if this entry contributes to charges
    pub fn is_chargeable(&self) -> bool {
        self.is_billable && self.status == EntryStatus::Approved
    }
}
