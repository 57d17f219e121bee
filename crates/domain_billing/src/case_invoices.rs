//! Case invoice generation
//!
//! Produces one invoice per matter billing request, dispatching on the
//! matter's fee model and enforcing the minimum-fee floor regardless of
//! method.

use std::sync::Arc;

use chrono::{Datelike, Duration};
use tracing::{info, instrument};

use core_kernel::{Clock, LawFirmId, MatterId, Money};

use crate::error::GenerationError;
use crate::invoice::{Invoice, InvoiceSource, InvoiceType};
use crate::matter::{BillingMethod, CaseBillingConfig, CaseOutcome, Matter};
use crate::ports::{BillingStore, InvoiceNumberAllocator, TimeEntryFilter};
use crate::rates::{apply_minimum_fee, hourly_charge, hybrid_charge, percentage_charge};
use crate::time_entry::TimeEntry;

/// Request to invoice a matter
#[derive(Debug, Clone)]
pub struct CaseInvoiceRequest {
    pub law_firm_id: LawFirmId,
    pub matter_id: MatterId,
    /// Whether time-based methods should fetch and charge time entries
    pub include_time_entries: bool,
}

/// Generates case invoices
pub struct CaseInvoiceGenerator {
    store: Arc<dyn BillingStore>,
    numbers: Arc<dyn InvoiceNumberAllocator>,
    clock: Arc<dyn Clock>,
}

impl CaseInvoiceGenerator {
    pub fn new(
        store: Arc<dyn BillingStore>,
        numbers: Arc<dyn InvoiceNumberAllocator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            numbers,
            clock,
        }
    }

    /// Generates a draft invoice for the matter
    ///
    /// There is no duplicate guard here: issuing the same request again is
    /// an explicit re-request and produces a new invoice.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the matter does not exist or belongs to a different
    ///   firm
    /// - `MissingBillingConfig` if the matter has no configuration, or the
    ///   configured method lacks its required field
    /// - `MissingOutcomeData` if a percentage-based method has no recorded
    ///   outcome
    /// - `Persistence` for storage failures
    #[instrument(skip(self), fields(matter_id = %request.matter_id))]
    pub async fn generate(&self, request: CaseInvoiceRequest) -> Result<Invoice, GenerationError> {
        let matter = self
            .store
            .get_matter(request.matter_id)
            .await?
            .filter(|m| m.law_firm_id == request.law_firm_id)
            .ok_or_else(|| GenerationError::not_found("matter", request.matter_id))?;

        let config = self
            .store
            .get_case_billing_config(matter.id)
            .await?
            .ok_or_else(|| {
                GenerationError::MissingBillingConfig(format!(
                    "matter {} has no billing configuration",
                    matter.id
                ))
            })?;

        let computed = self.compute_amount(&matter, &config, request.include_time_entries).await?;
        let amount = apply_minimum_fee(computed, config.minimum_fee)?;

        let issue_date = self.clock.today();
        let invoice_number = self
            .numbers
            .next_number(InvoiceType::CaseBilling.number_prefix(), issue_date.year())
            .await?;

        let invoice = Invoice::draft(
            matter.law_firm_id,
            matter.client_id,
            invoice_number,
            InvoiceSource::Matter { matter_id: matter.id },
            issue_date,
            config.payment_terms_days,
            issue_date + Duration::days(config.payment_terms_days as i64),
            amount,
            format!("{} ({} billing)", matter.title, config.billing_method),
            self.clock.now(),
        );

        self.store
            .insert_invoice(&invoice)
            .await
            .map_err(GenerationError::Persistence)?;

        info!(
            invoice_number = %invoice.invoice_number,
            method = %config.billing_method,
            total = %invoice.total_amount,
            "generated case invoice"
        );
        Ok(invoice)
    }

    /// Computes the charge for the configured fee model, before the
    /// minimum-fee floor
    async fn compute_amount(
        &self,
        matter: &Matter,
        config: &CaseBillingConfig,
        include_time_entries: bool,
    ) -> Result<Money, GenerationError> {
        let currency = self.config_currency(config);

        match config.billing_method {
            BillingMethod::Hourly => {
                let entries = self.chargeable_entries(matter, include_time_entries).await?;
                Ok(hourly_charge(&entries, currency)?)
            }
            BillingMethod::Fixed => config.fixed_fee.ok_or_else(|| {
                GenerationError::MissingBillingConfig(format!(
                    "matter {} is fixed-fee but has no fixed_fee",
                    matter.id
                ))
            }),
            BillingMethod::Percentage | BillingMethod::Contingency => {
                let rate = config.percentage_rate.ok_or_else(|| {
                    GenerationError::MissingBillingConfig(format!(
                        "matter {} is {} but has no percentage_rate",
                        matter.id, config.billing_method
                    ))
                })?;
                let outcome = self.required_outcome(matter.id).await?;
                Ok(percentage_charge(&outcome, rate)?)
            }
            BillingMethod::Hybrid => {
                let rate = config.percentage_rate.ok_or_else(|| {
                    GenerationError::MissingBillingConfig(format!(
                        "matter {} is hybrid but has no percentage_rate",
                        matter.id
                    ))
                })?;
                let outcome = self.required_outcome(matter.id).await?;
                let entries = self.chargeable_entries(matter, include_time_entries).await?;
                Ok(hybrid_charge(&entries, &outcome, rate, currency)?)
            }
            BillingMethod::Retainer => config.retainer_amount.ok_or_else(|| {
                GenerationError::MissingBillingConfig(format!(
                    "matter {} is retainer but has no retainer_amount",
                    matter.id
                ))
            }),
        }
    }

    async fn chargeable_entries(
        &self,
        matter: &Matter,
        include_time_entries: bool,
    ) -> Result<Vec<TimeEntry>, GenerationError> {
        if !include_time_entries {
            return Ok(Vec::new());
        }
        let filter = TimeEntryFilter {
            matter_id: Some(matter.id),
            chargeable_only: true,
            ..Default::default()
        };
        Ok(self.store.get_time_entries(&filter).await?)
    }

    /// An absent outcome is fatal for percentage-based methods, not a zero
    /// charge
    async fn required_outcome(&self, matter_id: MatterId) -> Result<CaseOutcome, GenerationError> {
        self.store
            .get_case_outcome(matter_id)
            .await?
            .ok_or_else(|| GenerationError::MissingOutcomeData(matter_id.to_string()))
    }

    fn config_currency(&self, config: &CaseBillingConfig) -> core_kernel::Currency {
        config
            .hourly_rate
            .or(config.fixed_fee)
            .or(config.retainer_amount)
            .or(config.minimum_fee)
            .map(|m| m.currency())
            .unwrap_or(core_kernel::Currency::USD)
    }
}
