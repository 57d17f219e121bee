//! Billing domain errors

use thiserror::Error;

use core_kernel::{MoneyError, PortError};

/// Errors returned by the invoice generators
///
/// All variants are recoverable by the caller; none crash the process. The
/// caller must not blindly retry `DuplicateInvoice`, and this crate never
/// retries `Persistence` failures internally.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The billing subject does not exist (or belongs to another firm)
    #[error("{0} not found")]
    NotFound(String),

    /// An invoice already covers this subject and period/installment
    #[error("An invoice already exists for {0}")]
    DuplicateInvoice(String),

    /// The subject's start date is after the requested period
    #[error("Subject is not active in the requested period: {0}")]
    SubjectNotActiveInPeriod(String),

    /// The billing configuration required by the chosen method is absent
    #[error("Missing billing configuration: {0}")]
    MissingBillingConfig(String),

    /// The outcome record required by a percentage/hybrid method is absent
    #[error("Missing outcome data for matter {0}")]
    MissingOutcomeData(String),

    /// A monetary calculation failed (e.g., mixed currencies in source data)
    #[error("Calculation error: {0}")]
    Calculation(#[from] MoneyError),

    /// Propagated from the storage collaborator; retry policy is the caller's
    #[error("Persistence error: {0}")]
    Persistence(#[source] PortError),
}

impl GenerationError {
    /// Creates a NotFound error for a subject kind and id
    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        GenerationError::NotFound(format!("{} {}", kind, id))
    }

    /// Returns true if the failure may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(self, GenerationError::Persistence(e) if e.is_transient())
    }
}

impl From<PortError> for GenerationError {
    fn from(error: PortError) -> Self {
        GenerationError::Persistence(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_the_subject() {
        let error = GenerationError::not_found("subscription", "SUBS-42");
        assert!(error.to_string().contains("subscription SUBS-42"));
    }

    #[test]
    fn test_only_transient_persistence_errors_are_transient() {
        let transient = GenerationError::Persistence(PortError::connection("refused"));
        assert!(transient.is_transient());

        let conflict = GenerationError::Persistence(PortError::conflict("dup"));
        assert!(!conflict.is_transient());

        let duplicate = GenerationError::DuplicateInvoice("plan x installment 2".to_string());
        assert!(!duplicate.is_transient());
    }
}
