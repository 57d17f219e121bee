//! Payment-plan invoice generation
//!
//! Produces one invoice per installment, adding a late fee when generation
//! falls past the grace period, plus a batch operation that invoices all
//! remaining installments with per-item success/failure.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tracing::{info, instrument, warn};

use core_kernel::{Clock, LawFirmId, Money, PaymentPlanId};

use crate::error::GenerationError;
use crate::invoice::{Invoice, InvoiceSource, InvoiceType, SubjectKey};
use crate::payment_plan::PaymentPlan;
use crate::ports::{BillingStore, InvoiceNumberAllocator};

/// Request to invoice one plan installment
#[derive(Debug, Clone)]
pub struct PlanInvoiceRequest {
    pub law_firm_id: LawFirmId,
    pub payment_plan_id: PaymentPlanId,
    /// Explicit installment number; next unbilled when omitted
    pub installment_number: Option<u32>,
    /// Generation date for the late-fee comparison; the clock's today when
    /// omitted
    pub as_of: Option<NaiveDate>,
}

/// Outcome of one installment within a batch run
#[derive(Debug)]
pub struct InstallmentResult {
    pub installment: u32,
    pub outcome: Result<Invoice, GenerationError>,
}

/// Result of a batch generation run, in installment order
#[derive(Debug, Default)]
pub struct BatchResult {
    pub results: Vec<InstallmentResult>,
}

impl BatchResult {
    /// Number of installments that produced an invoice
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_ok()).count()
    }

    /// Number of installments that failed
    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// Generates payment-plan installment invoices
pub struct PaymentPlanInvoiceGenerator {
    store: Arc<dyn BillingStore>,
    numbers: Arc<dyn InvoiceNumberAllocator>,
    clock: Arc<dyn Clock>,
}

impl PaymentPlanInvoiceGenerator {
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

    /// Generates a draft invoice for one installment
    ///
    /// # Errors
    ///
    /// - `NotFound` if the plan does not exist, belongs to a different
    ///   firm, or the installment number is not on the plan
    /// - `DuplicateInvoice` if the installment is already invoiced, or no
    ///   unbilled installment remains
    /// - `Persistence` for storage failures
    #[instrument(skip(self), fields(payment_plan_id = %request.payment_plan_id))]
    pub async fn generate(&self, request: PlanInvoiceRequest) -> Result<Invoice, GenerationError> {
        let plan = self
            .store
            .get_payment_plan(request.payment_plan_id)
            .await?
            .filter(|p| p.law_firm_id == request.law_firm_id)
            .ok_or_else(|| GenerationError::not_found("payment plan", request.payment_plan_id))?;

        let installment = match request.installment_number {
            Some(n) => {
                if !plan.has_installment(n) {
                    return Err(GenerationError::not_found(
                        "installment",
                        format!("{} of plan {}", n, plan.id),
                    ));
                }
                n
            }
            None => self.next_unbilled_installment(&plan).await?,
        };

        let key = SubjectKey::PlanInstallment {
            payment_plan_id: plan.id,
            installment,
        };
        if self.store.find_invoice(&key).await?.is_some() {
            return Err(GenerationError::DuplicateInvoice(key.to_string()));
        }

        let due_date = plan.installment_due_date(installment);
        let as_of = request.as_of.unwrap_or_else(|| self.clock.today());
        let late_fee = self.late_fee(&plan, installment, as_of);
        let subtotal = plan.installment_amount.checked_add(&late_fee)?;

        let invoice_number = self
            .numbers
            .next_number(InvoiceType::PaymentPlan.number_prefix(), due_date.year())
            .await?;

        let description = if late_fee.is_zero() {
            format!(
                "Installment {} of {} for plan {}",
                installment, plan.installment_count, plan.id
            )
        } else {
            format!(
                "Installment {} of {} for plan {} (includes late fee {})",
                installment, plan.installment_count, plan.id, late_fee
            )
        };

        let issue_date = as_of;
        let payment_terms_days = (due_date - issue_date).num_days().max(0) as u32;
        let invoice = Invoice::draft(
            plan.law_firm_id,
            plan.client_id,
            invoice_number,
            InvoiceSource::PaymentPlan {
                payment_plan_id: plan.id,
                installment,
            },
            issue_date,
            payment_terms_days,
            due_date,
            subtotal,
            description,
            self.clock.now(),
        );

        self.store.insert_invoice(&invoice).await.map_err(|e| {
            if e.is_conflict() {
                GenerationError::DuplicateInvoice(key.to_string())
            } else {
                GenerationError::Persistence(e)
            }
        })?;

        info!(
            invoice_number = %invoice.invoice_number,
            installment,
            late_fee = %late_fee,
            total = %invoice.total_amount,
            "generated payment plan invoice"
        );
        Ok(invoice)
    }

    /// Invoices every remaining installment from the start point onward
    ///
    /// Each installment succeeds or fails independently; one failure never
    /// aborts the batch. Results are reported in installment order for
    /// operator review.
    #[instrument(skip(self))]
    pub async fn generate_remaining_installments(
        &self,
        law_firm_id: LawFirmId,
        payment_plan_id: PaymentPlanId,
        start_from_installment: Option<u32>,
    ) -> Result<BatchResult, GenerationError> {
        let plan = self
            .store
            .get_payment_plan(payment_plan_id)
            .await?
            .filter(|p| p.law_firm_id == law_firm_id)
            .ok_or_else(|| GenerationError::not_found("payment plan", payment_plan_id))?;

        let start = start_from_installment.unwrap_or(1).max(1);
        let mut batch = BatchResult::default();

        for installment in start..=plan.installment_count {
            let outcome = self
                .generate(PlanInvoiceRequest {
                    law_firm_id,
                    payment_plan_id,
                    installment_number: Some(installment),
                    as_of: None,
                })
                .await;

            if let Err(error) = &outcome {
                warn!(installment, %error, "installment generation failed");
            }
            batch.results.push(InstallmentResult {
                installment,
                outcome,
            });
        }

        info!(
            succeeded = batch.succeeded(),
            failed = batch.failed(),
            "batch plan generation finished"
        );
        Ok(batch)
    }

    /// First installment number without an invoice
    async fn next_unbilled_installment(
        &self,
        plan: &PaymentPlan,
    ) -> Result<u32, GenerationError> {
        let billed = self.store.billed_installments(plan.id).await?;
        (1..=plan.installment_count)
            .find(|n| !billed.contains(n))
            .ok_or_else(|| {
                GenerationError::DuplicateInvoice(format!(
                    "all {} installments of plan {} are invoiced",
                    plan.installment_count, plan.id
                ))
            })
    }

    fn late_fee(&self, plan: &PaymentPlan, installment: u32, as_of: NaiveDate) -> Money {
        if plan.is_late(installment, as_of) {
            plan.late_fee_rate.apply(&plan.installment_amount).round_charge()
        } else {
            Money::zero(plan.installment_amount.currency())
        }
    }
}
