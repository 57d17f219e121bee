//! Test data builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the fields they care about and take defaults for
//! everything else.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use core_kernel::{
    ClientId, LawFirmId, MatterId, Money, PaymentPlanId, Rate, SubscriptionId, TimeEntryId,
};
use domain_billing::{
    BillingCycle, BillingMethod, CaseBillingConfig, EntryStatus, Matter, PaymentPlan,
    PlanFrequency, ServiceInclusion, Subscription, TimeEntry,
};

use crate::fixtures::usd;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Builder for test subscriptions
pub struct SubscriptionBuilder {
    id: SubscriptionId,
    law_firm_id: LawFirmId,
    client_id: ClientId,
    start_date: NaiveDate,
    monthly_fee: Money,
    billing_cycle: BillingCycle,
    inclusions: Vec<ServiceInclusion>,
}

impl Default for SubscriptionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionBuilder {
    pub fn new() -> Self {
        Self {
            id: SubscriptionId::new(),
            law_firm_id: LawFirmId::new(),
            client_id: ClientId::new(),
            start_date: date(2024, 1, 1),
            monthly_fee: usd(dec!(1500)),
            billing_cycle: BillingCycle::Monthly,
            inclusions: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: SubscriptionId) -> Self {
        self.id = id;
        self
    }

    pub fn with_law_firm(mut self, id: LawFirmId) -> Self {
        self.law_firm_id = id;
        self
    }

    pub fn with_client(mut self, id: ClientId) -> Self {
        self.client_id = id;
        self
    }

    pub fn starting(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }

    pub fn with_monthly_fee(mut self, fee: Money) -> Self {
        self.monthly_fee = fee;
        self
    }

    /// Adds a service inclusion with the given included quantity and
    /// overage rate
    pub fn with_inclusion(
        mut self,
        service_type: &str,
        quantity_included: u32,
        overage_rate: Money,
    ) -> Self {
        self.inclusions.push(ServiceInclusion::new(
            service_type,
            quantity_included,
            "sessions",
            overage_rate,
        ));
        self
    }

    pub fn build(self) -> Subscription {
        Subscription {
            id: self.id,
            law_firm_id: self.law_firm_id,
            client_id: self.client_id,
            start_date: self.start_date,
            monthly_fee: self.monthly_fee,
            billing_cycle: self.billing_cycle,
            inclusions: self.inclusions,
        }
    }
}

/// Builder for test matters and their billing configuration
pub struct MatterBuilder {
    id: MatterId,
    law_firm_id: LawFirmId,
    client_id: ClientId,
    title: String,
    config: CaseBillingConfig,
}

impl Default for MatterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MatterBuilder {
    pub fn new() -> Self {
        Self {
            id: MatterId::new(),
            law_firm_id: LawFirmId::new(),
            client_id: ClientId::new(),
            title: "Acme Corp contract dispute".to_string(),
            config: CaseBillingConfig {
                billing_method: BillingMethod::Hourly,
                hourly_rate: Some(usd(dec!(350))),
                fixed_fee: None,
                percentage_rate: None,
                retainer_amount: None,
                minimum_fee: None,
                payment_terms_days: 30,
            },
        }
    }

    pub fn with_id(mut self, id: MatterId) -> Self {
        self.id = id;
        self
    }

    pub fn with_law_firm(mut self, id: LawFirmId) -> Self {
        self.law_firm_id = id;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn hourly(mut self, rate: Money) -> Self {
        self.config.billing_method = BillingMethod::Hourly;
        self.config.hourly_rate = Some(rate);
        self
    }

    pub fn fixed(mut self, fee: Money) -> Self {
        self.config.billing_method = BillingMethod::Fixed;
        self.config.fixed_fee = Some(fee);
        self
    }

    pub fn percentage(mut self, rate: Rate) -> Self {
        self.config.billing_method = BillingMethod::Percentage;
        self.config.percentage_rate = Some(rate);
        self
    }

    pub fn contingency(mut self, rate: Rate) -> Self {
        self.config.billing_method = BillingMethod::Contingency;
        self.config.percentage_rate = Some(rate);
        self
    }

    pub fn hybrid(mut self, hourly_rate: Money, rate: Rate) -> Self {
        self.config.billing_method = BillingMethod::Hybrid;
        self.config.hourly_rate = Some(hourly_rate);
        self.config.percentage_rate = Some(rate);
        self
    }

    pub fn retainer(mut self, amount: Money) -> Self {
        self.config.billing_method = BillingMethod::Retainer;
        self.config.retainer_amount = Some(amount);
        self
    }

    pub fn with_minimum_fee(mut self, minimum: Money) -> Self {
        self.config.minimum_fee = Some(minimum);
        self
    }

    pub fn with_payment_terms(mut self, days: u32) -> Self {
        self.config.payment_terms_days = days;
        self
    }

    /// Builds the matter and its configuration as stored separately
    pub fn build(self) -> (Matter, CaseBillingConfig) {
        (
            Matter {
                id: self.id,
                law_firm_id: self.law_firm_id,
                client_id: self.client_id,
                title: self.title,
            },
            self.config,
        )
    }
}

/// Builder for test payment plans
pub struct PaymentPlanBuilder {
    id: PaymentPlanId,
    law_firm_id: LawFirmId,
    client_id: ClientId,
    matter_id: MatterId,
    installment_count: u32,
    installment_amount: Money,
    frequency: PlanFrequency,
    first_payment_date: NaiveDate,
    grace_period_days: u32,
    late_fee_rate: Rate,
    auto_generate_invoices: bool,
}

impl Default for PaymentPlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentPlanBuilder {
    pub fn new() -> Self {
        Self {
            id: PaymentPlanId::new(),
            law_firm_id: LawFirmId::new(),
            client_id: ClientId::new(),
            matter_id: MatterId::new(),
            installment_count: 4,
            installment_amount: usd(dec!(2500)),
            frequency: PlanFrequency::Monthly,
            first_payment_date: date(2025, 1, 15),
            grace_period_days: 5,
            late_fee_rate: Rate::from_percentage(dec!(3)),
            auto_generate_invoices: false,
        }
    }

    pub fn with_id(mut self, id: PaymentPlanId) -> Self {
        self.id = id;
        self
    }

    pub fn with_law_firm(mut self, id: LawFirmId) -> Self {
        self.law_firm_id = id;
        self
    }

    pub fn with_installments(mut self, count: u32, amount: Money) -> Self {
        self.installment_count = count;
        self.installment_amount = amount;
        self
    }

    pub fn with_frequency(mut self, frequency: PlanFrequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn first_due(mut self, date: NaiveDate) -> Self {
        self.first_payment_date = date;
        self
    }

    pub fn with_grace_period(mut self, days: u32) -> Self {
        self.grace_period_days = days;
        self
    }

    pub fn with_late_fee_rate(mut self, rate: Rate) -> Self {
        self.late_fee_rate = rate;
        self
    }

    pub fn auto_generating(mut self) -> Self {
        self.auto_generate_invoices = true;
        self
    }

    pub fn build(self) -> PaymentPlan {
        let total = self
            .installment_amount
            .multiply(rust_decimal::Decimal::from(self.installment_count));
        PaymentPlan {
            id: self.id,
            law_firm_id: self.law_firm_id,
            client_id: self.client_id,
            matter_id: self.matter_id,
            total_amount: total,
            installment_count: self.installment_count,
            installment_amount: self.installment_amount,
            frequency: self.frequency,
            first_payment_date: self.first_payment_date,
            grace_period_days: self.grace_period_days,
            late_fee_rate: self.late_fee_rate,
            auto_generate_invoices: self.auto_generate_invoices,
        }
    }
}

/// Builder for test time entries
pub struct TimeEntryBuilder {
    matter_id: Option<MatterId>,
    subscription_id: Option<SubscriptionId>,
    service_type: Option<String>,
    entry_date: NaiveDate,
    effective_minutes: u32,
    billable_rate: Money,
    billable_amount: Money,
    is_billable: bool,
    status: EntryStatus,
}

impl Default for TimeEntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeEntryBuilder {
    pub fn new() -> Self {
        Self {
            matter_id: None,
            subscription_id: None,
            service_type: None,
            entry_date: date(2025, 1, 10),
            effective_minutes: 60,
            billable_rate: usd(dec!(350)),
            billable_amount: usd(dec!(350)),
            is_billable: true,
            status: EntryStatus::Approved,
        }
    }

    pub fn for_matter(mut self, id: MatterId) -> Self {
        self.matter_id = Some(id);
        self
    }

    pub fn for_subscription(mut self, id: SubscriptionId, service_type: &str) -> Self {
        self.subscription_id = Some(id);
        self.service_type = Some(service_type.to_string());
        self
    }

    pub fn on(mut self, entry_date: NaiveDate) -> Self {
        self.entry_date = entry_date;
        self
    }

    pub fn lasting_minutes(mut self, minutes: u32) -> Self {
        self.effective_minutes = minutes;
        self
    }

    pub fn amounting_to(mut self, amount: Money) -> Self {
        self.billable_amount = amount;
        self
    }

    pub fn non_billable(mut self) -> Self {
        self.is_billable = false;
        self
    }

    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> TimeEntry {
        TimeEntry {
            id: TimeEntryId::new(),
            matter_id: self.matter_id,
            subscription_id: self.subscription_id,
            service_type: self.service_type,
            entry_date: self.entry_date,
            effective_minutes: self.effective_minutes,
            is_billable: self.is_billable,
            billable_rate: self.billable_rate,
            billable_amount: self.billable_amount,
            status: self.status,
        }
    }
}
