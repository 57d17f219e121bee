//! Matters and case billing configuration
//!
//! A matter is a unit of legal work for a client. Its billing configuration
//! selects one of six fee models; the case invoice generator dispatches on
//! the model exhaustively, so adding a model is a compile-time-checked
//! change rather than a string comparison.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{ClientId, LawFirmId, MatterId, Money, Rate};

/// Fee model for a matter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingMethod {
    /// Bill approved time entries at their recorded amounts
    Hourly,
    /// A single agreed fee
    Fixed,
    /// A percentage of the amount recovered
    Percentage,
    /// Percentage of recovery, contingent on a successful outcome
    Contingency,
    /// Hourly time charges plus a percentage of recovery
    Hybrid,
    /// A retainer amount billed as configured
    Retainer,
}

impl BillingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingMethod::Hourly => "hourly",
            BillingMethod::Fixed => "fixed",
            BillingMethod::Percentage => "percentage",
            BillingMethod::Contingency => "contingency",
            BillingMethod::Hybrid => "hybrid",
            BillingMethod::Retainer => "retainer",
        }
    }
}

impl std::fmt::Display for BillingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Billing configuration attached to a matter
///
/// Which optional fields must be present depends on the method: `Fixed`
/// requires `fixed_fee`, `Percentage`/`Contingency`/`Hybrid` require
/// `percentage_rate`, `Retainer` requires `retainer_amount`. A missing
/// required field surfaces as `MissingBillingConfig` at generation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseBillingConfig {
    /// Selected fee model
    pub billing_method: BillingMethod,
    /// Hourly rate used when recording time entries
    pub hourly_rate: Option<Money>,
    /// Agreed fee for fixed-fee matters
    pub fixed_fee: Option<Money>,
    /// Percentage of recovery for percentage/contingency/hybrid matters
    pub percentage_rate: Option<Rate>,
    /// Retainer amount for retainer matters
    pub retainer_amount: Option<Money>,
    /// Contractual lower bound on the computed charge
    pub minimum_fee: Option<Money>,
    /// Days from issue date until the invoice is due
    pub payment_terms_days: u32,
}

/// A unit of legal work for a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matter {
    /// Unique identifier
    pub id: MatterId,
    /// Owning law firm
    pub law_firm_id: LawFirmId,
    /// Client the work is for
    pub client_id: ClientId,
    /// Short human-readable title
    pub title: String,
}

/// Recorded outcome of a matter, the base for percentage charges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOutcome {
    /// Matter the outcome belongs to
    pub matter_id: MatterId,
    /// Amount recovered for the client
    pub amount_recovered: Money,
    /// Flat success fee added on top of the percentage charge
    pub success_fee: Money,
    /// Date the outcome was recorded
    pub recorded_on: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billing_method_round_trips_through_serde() {
        for method in [
            BillingMethod::Hourly,
            BillingMethod::Fixed,
            BillingMethod::Percentage,
            BillingMethod::Contingency,
            BillingMethod::Hybrid,
            BillingMethod::Retainer,
        ] {
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json.trim_matches('"'), method.as_str());
        }
    }
}
