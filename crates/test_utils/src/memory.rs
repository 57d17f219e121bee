//! In-memory port fakes
//!
//! `InMemoryBillingStore` backs the generator tests without a database. It
//! enforces the same subject-key uniqueness the PostgreSQL constraint does,
//! so duplicate-guard behavior is exercised for real.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;

use core_kernel::ports::DomainPort;
use core_kernel::{MatterId, PaymentPlanId, PortError, SubscriptionId};
use domain_billing::{
    BillingStore, CaseBillingConfig, CaseOutcome, Invoice, InvoiceNumberAllocator,
    InvoiceSource, Matter, PaymentPlan, SubjectKey, Subscription, TimeEntry, TimeEntryFilter,
};

#[derive(Default)]
struct StoreState {
    subscriptions: HashMap<SubscriptionId, Subscription>,
    matters: HashMap<MatterId, Matter>,
    configs: HashMap<MatterId, CaseBillingConfig>,
    outcomes: HashMap<MatterId, CaseOutcome>,
    plans: HashMap<PaymentPlanId, PaymentPlan>,
    time_entries: Vec<TimeEntry>,
    invoices: Vec<Invoice>,
}

/// In-memory [`BillingStore`] fake
#[derive(Default)]
pub struct InMemoryBillingStore {
    state: RwLock<StoreState>,
}

impl InMemoryBillingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_subscription(&self, subscription: Subscription) {
        self.state
            .write()
            .unwrap()
            .subscriptions
            .insert(subscription.id, subscription);
    }

    pub fn put_matter(&self, matter: Matter) {
        self.state.write().unwrap().matters.insert(matter.id, matter);
    }

    pub fn put_case_billing_config(&self, matter_id: MatterId, config: CaseBillingConfig) {
        self.state.write().unwrap().configs.insert(matter_id, config);
    }

    pub fn put_case_outcome(&self, outcome: CaseOutcome) {
        self.state
            .write()
            .unwrap()
            .outcomes
            .insert(outcome.matter_id, outcome);
    }

    pub fn put_payment_plan(&self, plan: PaymentPlan) {
        self.state.write().unwrap().plans.insert(plan.id, plan);
    }

    pub fn put_time_entry(&self, entry: TimeEntry) {
        self.state.write().unwrap().time_entries.push(entry);
    }

    /// Snapshot of every stored invoice, for assertions
    pub fn invoices(&self) -> Vec<Invoice> {
        self.state.read().unwrap().invoices.clone()
    }
}

impl DomainPort for InMemoryBillingStore {}

#[async_trait]
impl BillingStore for InMemoryBillingStore {
    async fn get_subscription(
        &self,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, PortError> {
        Ok(self.state.read().unwrap().subscriptions.get(&id).cloned())
    }

    async fn get_matter(&self, id: MatterId) -> Result<Option<Matter>, PortError> {
        Ok(self.state.read().unwrap().matters.get(&id).cloned())
    }

    async fn get_case_billing_config(
        &self,
        matter_id: MatterId,
    ) -> Result<Option<CaseBillingConfig>, PortError> {
        Ok(self.state.read().unwrap().configs.get(&matter_id).cloned())
    }

    async fn get_time_entries(
        &self,
        filter: &TimeEntryFilter,
    ) -> Result<Vec<TimeEntry>, PortError> {
        Ok(self
            .state
            .read()
            .unwrap()
            .time_entries
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    async fn get_case_outcome(
        &self,
        matter_id: MatterId,
    ) -> Result<Option<CaseOutcome>, PortError> {
        Ok(self.state.read().unwrap().outcomes.get(&matter_id).cloned())
    }

    async fn get_payment_plan(
        &self,
        id: PaymentPlanId,
    ) -> Result<Option<PaymentPlan>, PortError> {
        Ok(self.state.read().unwrap().plans.get(&id).cloned())
    }

    async fn find_invoice(&self, key: &SubjectKey) -> Result<Option<Invoice>, PortError> {
        Ok(self
            .state
            .read()
            .unwrap()
            .invoices
            .iter()
            .find(|i| i.subject_key().as_ref() == Some(key))
            .cloned())
    }

    async fn billed_installments(
        &self,
        payment_plan_id: PaymentPlanId,
    ) -> Result<Vec<u32>, PortError> {
        Ok(self
            .state
            .read()
            .unwrap()
            .invoices
            .iter()
            .filter_map(|i| match i.source {
                InvoiceSource::PaymentPlan {
                    payment_plan_id: id,
                    installment,
                } if id == payment_plan_id => Some(installment),
                _ => None,
            })
            .collect())
    }

    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), PortError> {
        let mut state = self.state.write().unwrap();
        if let Some(key) = invoice.subject_key() {
            let taken = state
                .invoices
                .iter()
                .any(|existing| existing.subject_key() == Some(key));
            if taken {
                return Err(PortError::conflict(format!(
                    "invoice already exists for {key}"
                )));
            }
        }
        state.invoices.push(invoice.clone());
        Ok(())
    }
}

/// Counter-backed [`InvoiceNumberAllocator`]
///
/// Sequences are independent per (prefix, year), matching the database
/// sequence table.
#[derive(Default)]
pub struct SequenceNumberAllocator {
    sequences: Mutex<HashMap<(String, i32), u32>>,
}

impl SequenceNumberAllocator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainPort for SequenceNumberAllocator {}

#[async_trait]
impl InvoiceNumberAllocator for SequenceNumberAllocator {
    async fn next_number(&self, prefix: &str, year: i32) -> Result<String, PortError> {
        let mut sequences = self.sequences.lock().unwrap();
        let seq = sequences.entry((prefix.to_string(), year)).or_insert(0);
        *seq += 1;
        Ok(format!("{prefix}-{year}-{seq:06}"))
    }
}
