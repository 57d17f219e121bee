//! Subscription invoice generation
//!
//! Produces one invoice per subscription per billing period: a prorated
//! base fee plus metered overage for usage beyond each service inclusion.

use std::sync::Arc;

use chrono::Duration;
use tracing::{info, instrument};

use core_kernel::{Clock, LawFirmId, Money, SubscriptionId};

use crate::error::GenerationError;
use crate::invoice::{Invoice, InvoiceSource, InvoiceType, SubjectKey};
use crate::period::BillingPeriod;
use crate::ports::{BillingStore, InvoiceNumberAllocator, TimeEntryFilter};
use crate::proration::prorated_monthly_fee;
use crate::rates::overage_charge;
use crate::subscription::Subscription;

/// Payment terms applied to subscription invoices
const DEFAULT_PAYMENT_TERMS_DAYS: u32 = 30;

/// Request to invoice one subscription for one billing period
#[derive(Debug, Clone)]
pub struct SubscriptionInvoiceRequest {
    pub law_firm_id: LawFirmId,
    pub subscription_id: SubscriptionId,
    pub period: BillingPeriod,
}

/// Generates subscription invoices
pub struct SubscriptionInvoiceGenerator {
    store: Arc<dyn BillingStore>,
    numbers: Arc<dyn InvoiceNumberAllocator>,
    clock: Arc<dyn Clock>,
}

impl SubscriptionInvoiceGenerator {
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

    /// Generates a draft invoice for the requested period
    ///
    /// # Errors
    ///
    /// - `NotFound` if the subscription does not exist or belongs to a
    ///   different firm
    /// - `SubjectNotActiveInPeriod` if the subscription starts after the
    ///   period ends
    /// - `DuplicateInvoice` if the period is already invoiced
    /// - `Persistence` for storage failures
    #[instrument(skip(self), fields(subscription_id = %request.subscription_id))]
    pub async fn generate(
        &self,
        request: SubscriptionInvoiceRequest,
    ) -> Result<Invoice, GenerationError> {
        let subscription = self
            .store
            .get_subscription(request.subscription_id)
            .await?
            .filter(|s| s.law_firm_id == request.law_firm_id)
            .ok_or_else(|| GenerationError::not_found("subscription", request.subscription_id))?;

        if !subscription.is_active_in(&request.period) {
            return Err(GenerationError::SubjectNotActiveInPeriod(format!(
                "subscription {} starts {} but the period ends {}",
                subscription.id,
                subscription.start_date,
                request.period.end()
            )));
        }

        let key = SubjectKey::SubscriptionPeriod {
            subscription_id: subscription.id,
            period: request.period,
        };
        if self.store.find_invoice(&key).await?.is_some() {
            return Err(GenerationError::DuplicateInvoice(key.to_string()));
        }

        let base = prorated_monthly_fee(
            &request.period,
            subscription.start_date,
            subscription.monthly_fee,
        );
        let overage = self.overage_total(&subscription, &request.period).await?;
        let subtotal = base.checked_add(&overage)?;

        let issue_date = self.clock.today();
        let invoice_number = self
            .numbers
            .next_number(InvoiceType::Subscription.number_prefix(), request.period.year())
            .await?;

        let invoice = Invoice::draft(
            subscription.law_firm_id,
            subscription.client_id,
            invoice_number,
            InvoiceSource::Subscription {
                subscription_id: subscription.id,
                period: request.period,
            },
            issue_date,
            DEFAULT_PAYMENT_TERMS_DAYS,
            issue_date + Duration::days(DEFAULT_PAYMENT_TERMS_DAYS as i64),
            subtotal,
            format!("Subscription services for {}", request.period),
            self.clock.now(),
        );

        // The unique constraint on the subject key is the backstop for the
        // read-side check under concurrent generation.
        self.store.insert_invoice(&invoice).await.map_err(|e| {
            if e.is_conflict() {
                GenerationError::DuplicateInvoice(key.to_string())
            } else {
                GenerationError::Persistence(e)
            }
        })?;

        info!(
            invoice_number = %invoice.invoice_number,
            base = %base,
            overage = %overage,
            total = %invoice.total_amount,
            "generated subscription invoice"
        );
        Ok(invoice)
    }

    /// Sums overage charges across the subscription's service inclusions
    ///
    /// Usage for an inclusion is the count of chargeable time entries
    /// tagged with the subscription and the inclusion's service type inside
    /// the period.
    async fn overage_total(
        &self,
        subscription: &Subscription,
        period: &BillingPeriod,
    ) -> Result<Money, GenerationError> {
        let mut total = Money::zero(subscription.monthly_fee.currency());

        for inclusion in &subscription.inclusions {
            let filter = TimeEntryFilter {
                subscription_id: Some(subscription.id),
                service_type: Some(inclusion.service_type.clone()),
                from: Some(period.start()),
                to: Some(period.end()),
                chargeable_only: true,
                ..Default::default()
            };
            let used = self.store.get_time_entries(&filter).await?.len() as u32;
            let charge =
                overage_charge(used, inclusion.quantity_included, inclusion.overage_rate);
            total = total.checked_add(&charge)?;
        }

        Ok(total)
    }
}
