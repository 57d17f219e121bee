//! PostgreSQL billing store
//!
//! Implements `BillingStore` and `InvoiceNumberAllocator` over the billing
//! schema. Monetary columns are NUMERIC plus an ISO 4217 currency code;
//! enums are stored as text and decoded here. The invoice table carries
//! partial unique indexes over (subscription_id, period_start, period_end)
//! and (payment_plan_id, installment_number); a violation surfaces as
//! `PortError::Conflict`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::ports::DomainPort;
use core_kernel::{
    ClientId, Currency, InvoiceId, LawFirmId, MatterId, Money, PaymentPlanId, PortError, Rate,
    SubscriptionId, TimeEntryId,
};
use domain_billing::{
    BillingCycle, BillingPeriod, BillingStore, CaseBillingConfig, CaseOutcome, EntryStatus,
    Invoice, InvoiceNumberAllocator, InvoiceSource, InvoiceStatus, BillingMethod, Matter,
    PaymentPlan, PlanFrequency, ServiceInclusion, SubjectKey, Subscription, TimeEntry,
    TimeEntryFilter,
};

use crate::error::DatabaseError;

/// PostgreSQL-backed implementation of the billing store port
#[derive(Debug, Clone)]
pub struct PgBillingStore {
    pool: PgPool,
}

impl PgBillingStore {
    /// Creates a new store over the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PgBillingStore {}

fn db(error: sqlx::Error) -> PortError {
    DatabaseError::from(error).into()
}

fn invalid(message: impl Into<String>) -> PortError {
    PortError::from(DatabaseError::InvalidData(message.into()))
}

fn parse_currency(code: &str) -> Result<Currency, PortError> {
    Currency::from_code(code).ok_or_else(|| invalid(format!("unknown currency code '{code}'")))
}

fn money(amount: Decimal, code: &str) -> Result<Money, PortError> {
    Ok(Money::new(amount, parse_currency(code)?))
}

fn opt_money(amount: Option<Decimal>, code: &str) -> Result<Option<Money>, PortError> {
    amount.map(|a| money(a, code)).transpose()
}

#[derive(sqlx::FromRow)]
struct SubscriptionRow {
    subscription_id: Uuid,
    law_firm_id: Uuid,
    client_id: Uuid,
    start_date: NaiveDate,
    monthly_fee: Decimal,
    currency: String,
    billing_cycle: String,
}

#[derive(sqlx::FromRow)]
struct InclusionRow {
    service_type: String,
    quantity_included: i32,
    unit: String,
    overage_rate: Decimal,
    currency: String,
}

#[derive(sqlx::FromRow)]
struct MatterRow {
    matter_id: Uuid,
    law_firm_id: Uuid,
    client_id: Uuid,
    title: String,
}

#[derive(sqlx::FromRow)]
struct CaseBillingConfigRow {
    billing_method: String,
    hourly_rate: Option<Decimal>,
    fixed_fee: Option<Decimal>,
    percentage_rate: Option<Decimal>,
    retainer_amount: Option<Decimal>,
    minimum_fee: Option<Decimal>,
    payment_terms_days: i32,
    currency: String,
}

#[derive(sqlx::FromRow)]
struct CaseOutcomeRow {
    matter_id: Uuid,
    amount_recovered: Decimal,
    success_fee: Decimal,
    currency: String,
    recorded_on: NaiveDate,
}

#[derive(sqlx::FromRow)]
struct PaymentPlanRow {
    payment_plan_id: Uuid,
    law_firm_id: Uuid,
    client_id: Uuid,
    matter_id: Uuid,
    total_amount: Decimal,
    installment_count: i32,
    installment_amount: Decimal,
    currency: String,
    frequency: String,
    first_payment_date: NaiveDate,
    grace_period_days: i32,
    late_fee_rate: Decimal,
    auto_generate_invoices: bool,
}

#[derive(sqlx::FromRow)]
struct TimeEntryRow {
    time_entry_id: Uuid,
    matter_id: Option<Uuid>,
    subscription_id: Option<Uuid>,
    service_type: Option<String>,
    entry_date: NaiveDate,
    effective_minutes: i32,
    is_billable: bool,
    billable_rate: Decimal,
    billable_amount: Decimal,
    currency: String,
    status: String,
}

#[derive(sqlx::FromRow)]
struct InvoiceRow {
    invoice_id: Uuid,
    law_firm_id: Uuid,
    client_id: Uuid,
    invoice_number: String,
    invoice_type: String,
    subscription_id: Option<Uuid>,
    period_start: Option<NaiveDate>,
    period_end: Option<NaiveDate>,
    matter_id: Option<Uuid>,
    payment_plan_id: Option<Uuid>,
    installment_number: Option<i32>,
    status: String,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    subtotal: Decimal,
    tax_amount: Decimal,
    discount_amount: Decimal,
    total_amount: Decimal,
    currency: String,
    payment_terms_days: i32,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_billing_cycle(s: &str) -> Result<BillingCycle, PortError> {
    match s {
        "monthly" => Ok(BillingCycle::Monthly),
        "quarterly" => Ok(BillingCycle::Quarterly),
        "annual" => Ok(BillingCycle::Annual),
        other => Err(invalid(format!("unknown billing cycle '{other}'"))),
    }
}

fn parse_billing_method(s: &str) -> Result<BillingMethod, PortError> {
    match s {
        "hourly" => Ok(BillingMethod::Hourly),
        "fixed" => Ok(BillingMethod::Fixed),
        "percentage" => Ok(BillingMethod::Percentage),
        "contingency" => Ok(BillingMethod::Contingency),
        "hybrid" => Ok(BillingMethod::Hybrid),
        "retainer" => Ok(BillingMethod::Retainer),
        other => Err(invalid(format!("unknown billing method '{other}'"))),
    }
}

fn parse_frequency(s: &str) -> Result<PlanFrequency, PortError> {
    match s {
        "weekly" => Ok(PlanFrequency::Weekly),
        "biweekly" => Ok(PlanFrequency::Biweekly),
        "monthly" => Ok(PlanFrequency::Monthly),
        "quarterly" => Ok(PlanFrequency::Quarterly),
        other => Err(invalid(format!("unknown plan frequency '{other}'"))),
    }
}

fn parse_entry_status(s: &str) -> Result<EntryStatus, PortError> {
    match s {
        "draft" => Ok(EntryStatus::Draft),
        "submitted" => Ok(EntryStatus::Submitted),
        "approved" => Ok(EntryStatus::Approved),
        "rejected" => Ok(EntryStatus::Rejected),
        other => Err(invalid(format!("unknown entry status '{other}'"))),
    }
}

fn parse_invoice_status(s: &str) -> Result<InvoiceStatus, PortError> {
    match s {
        "draft" => Ok(InvoiceStatus::Draft),
        "sent" => Ok(InvoiceStatus::Sent),
        "paid" => Ok(InvoiceStatus::Paid),
        "overdue" => Ok(InvoiceStatus::Overdue),
        "cancelled" => Ok(InvoiceStatus::Cancelled),
        other => Err(invalid(format!("unknown invoice status '{other}'"))),
    }
}

fn invoice_status_str(status: InvoiceStatus) -> &'static str {
    match status {
        InvoiceStatus::Draft => "draft",
        InvoiceStatus::Sent => "sent",
        InvoiceStatus::Paid => "paid",
        InvoiceStatus::Overdue => "overdue",
        InvoiceStatus::Cancelled => "cancelled",
    }
}

fn invoice_type_str(source: &InvoiceSource) -> &'static str {
    match source {
        InvoiceSource::Subscription { .. } => "subscription",
        InvoiceSource::Matter { .. } => "case_billing",
        InvoiceSource::PaymentPlan { .. } => "payment_plan",
    }
}

fn row_to_source(row: &InvoiceRow) -> Result<InvoiceSource, PortError> {
    match row.invoice_type.as_str() {
        "subscription" => {
            let subscription_id = row
                .subscription_id
                .ok_or_else(|| invalid("subscription invoice without subscription_id"))?;
            let (start, end) = match (row.period_start, row.period_end) {
                (Some(s), Some(e)) => (s, e),
                _ => return Err(invalid("subscription invoice without billing period")),
            };
            let period = BillingPeriod::new(start, end)
                .map_err(|e| invalid(format!("stored billing period: {e}")))?;
            Ok(InvoiceSource::Subscription {
                subscription_id: SubscriptionId::from(subscription_id),
                period,
            })
        }
        "case_billing" => {
            let matter_id = row
                .matter_id
                .ok_or_else(|| invalid("case invoice without matter_id"))?;
            Ok(InvoiceSource::Matter {
                matter_id: MatterId::from(matter_id),
            })
        }
        "payment_plan" => {
            let payment_plan_id = row
                .payment_plan_id
                .ok_or_else(|| invalid("plan invoice without payment_plan_id"))?;
            let installment = row
                .installment_number
                .ok_or_else(|| invalid("plan invoice without installment_number"))?;
            Ok(InvoiceSource::PaymentPlan {
                payment_plan_id: PaymentPlanId::from(payment_plan_id),
                installment: installment as u32,
            })
        }
        other => Err(invalid(format!("unknown invoice type '{other}'"))),
    }
}

fn row_to_invoice(row: InvoiceRow) -> Result<Invoice, PortError> {
    let source = row_to_source(&row)?;
    Ok(Invoice {
        id: InvoiceId::from(row.invoice_id),
        law_firm_id: LawFirmId::from(row.law_firm_id),
        client_id: ClientId::from(row.client_id),
        invoice_number: row.invoice_number.clone(),
        source,
        status: parse_invoice_status(&row.status)?,
        issue_date: row.issue_date,
        due_date: row.due_date,
        subtotal: money(row.subtotal, &row.currency)?,
        tax_amount: money(row.tax_amount, &row.currency)?,
        discount_amount: money(row.discount_amount, &row.currency)?,
        total_amount: money(row.total_amount, &row.currency)?,
        payment_terms_days: row.payment_terms_days as u32,
        description: row.description,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn row_to_time_entry(row: TimeEntryRow) -> Result<TimeEntry, PortError> {
    Ok(TimeEntry {
        id: TimeEntryId::from(row.time_entry_id),
        matter_id: row.matter_id.map(MatterId::from),
        subscription_id: row.subscription_id.map(SubscriptionId::from),
        service_type: row.service_type,
        entry_date: row.entry_date,
        effective_minutes: row.effective_minutes as u32,
        is_billable: row.is_billable,
        billable_rate: money(row.billable_rate, &row.currency)?,
        billable_amount: money(row.billable_amount, &row.currency)?,
        status: parse_entry_status(&row.status)?,
    })
}

#[async_trait]
impl BillingStore for PgBillingStore {
    #[instrument(skip(self), fields(subscription_id = %id))]
    async fn get_subscription(
        &self,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, PortError> {
        debug!("fetching subscription");

        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT subscription_id, law_firm_id, client_id, start_date,
                   monthly_fee, currency, billing_cycle
            FROM subscriptions
            WHERE subscription_id = $1
            "#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let inclusion_rows = sqlx::query_as::<_, InclusionRow>(
            r#"
            SELECT service_type, quantity_included, unit, overage_rate, currency
            FROM subscription_inclusions
            WHERE subscription_id = $1
            ORDER BY service_type
            "#,
        )
        .bind(Uuid::from(id))
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        let mut inclusions = Vec::with_capacity(inclusion_rows.len());
        for inc in inclusion_rows {
            inclusions.push(ServiceInclusion::new(
                inc.service_type,
                inc.quantity_included as u32,
                inc.unit,
                money(inc.overage_rate, &inc.currency)?,
            ));
        }

        Ok(Some(Subscription {
            id: SubscriptionId::from(row.subscription_id),
            law_firm_id: LawFirmId::from(row.law_firm_id),
            client_id: ClientId::from(row.client_id),
            start_date: row.start_date,
            monthly_fee: money(row.monthly_fee, &row.currency)?,
            billing_cycle: parse_billing_cycle(&row.billing_cycle)?,
            inclusions,
        }))
    }

    #[instrument(skip(self), fields(matter_id = %id))]
    async fn get_matter(&self, id: MatterId) -> Result<Option<Matter>, PortError> {
        let row = sqlx::query_as::<_, MatterRow>(
            r#"
            SELECT matter_id, law_firm_id, client_id, title
            FROM matters
            WHERE matter_id = $1
            "#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;

        Ok(row.map(|row| Matter {
            id: MatterId::from(row.matter_id),
            law_firm_id: LawFirmId::from(row.law_firm_id),
            client_id: ClientId::from(row.client_id),
            title: row.title,
        }))
    }

    #[instrument(skip(self), fields(matter_id = %matter_id))]
    async fn get_case_billing_config(
        &self,
        matter_id: MatterId,
    ) -> Result<Option<CaseBillingConfig>, PortError> {
        let row = sqlx::query_as::<_, CaseBillingConfigRow>(
            r#"
            SELECT billing_method, hourly_rate, fixed_fee, percentage_rate,
                   retainer_amount, minimum_fee, payment_terms_days, currency
            FROM case_billing_configs
            WHERE matter_id = $1
            "#,
        )
        .bind(Uuid::from(matter_id))
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(CaseBillingConfig {
            billing_method: parse_billing_method(&row.billing_method)?,
            hourly_rate: opt_money(row.hourly_rate, &row.currency)?,
            fixed_fee: opt_money(row.fixed_fee, &row.currency)?,
            percentage_rate: row.percentage_rate.map(Rate::new),
            retainer_amount: opt_money(row.retainer_amount, &row.currency)?,
            minimum_fee: opt_money(row.minimum_fee, &row.currency)?,
            payment_terms_days: row.payment_terms_days as u32,
        }))
    }

    #[instrument(skip(self, filter))]
    async fn get_time_entries(
        &self,
        filter: &TimeEntryFilter,
    ) -> Result<Vec<TimeEntry>, PortError> {
        debug!(?filter, "fetching time entries");

        let rows = sqlx::query_as::<_, TimeEntryRow>(
            r#"
            SELECT time_entry_id, matter_id, subscription_id, service_type,
                   entry_date, effective_minutes, is_billable,
                   billable_rate, billable_amount, currency, status
            FROM time_entries
            WHERE ($1::uuid IS NULL OR matter_id = $1)
              AND ($2::uuid IS NULL OR subscription_id = $2)
              AND ($3::text IS NULL OR service_type = $3)
              AND ($4::date IS NULL OR entry_date >= $4)
              AND ($5::date IS NULL OR entry_date <= $5)
              AND (NOT $6 OR (is_billable AND status = 'approved'))
            ORDER BY entry_date, time_entry_id
            "#,
        )
        .bind(filter.matter_id.map(Uuid::from))
        .bind(filter.subscription_id.map(Uuid::from))
        .bind(filter.service_type.as_deref())
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.chargeable_only)
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        rows.into_iter().map(row_to_time_entry).collect()
    }

    #[instrument(skip(self), fields(matter_id = %matter_id))]
    async fn get_case_outcome(
        &self,
        matter_id: MatterId,
    ) -> Result<Option<CaseOutcome>, PortError> {
        let row = sqlx::query_as::<_, CaseOutcomeRow>(
            r#"
            SELECT matter_id, amount_recovered, success_fee, currency, recorded_on
            FROM case_outcomes
            WHERE matter_id = $1
            "#,
        )
        .bind(Uuid::from(matter_id))
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(CaseOutcome {
            matter_id: MatterId::from(row.matter_id),
            amount_recovered: money(row.amount_recovered, &row.currency)?,
            success_fee: money(row.success_fee, &row.currency)?,
            recorded_on: row.recorded_on,
        }))
    }

    #[instrument(skip(self), fields(payment_plan_id = %id))]
    async fn get_payment_plan(
        &self,
        id: PaymentPlanId,
    ) -> Result<Option<PaymentPlan>, PortError> {
        let row = sqlx::query_as::<_, PaymentPlanRow>(
            r#"
            SELECT payment_plan_id, law_firm_id, client_id, matter_id,
                   total_amount, installment_count, installment_amount, currency,
                   frequency, first_payment_date, grace_period_days,
                   late_fee_rate, auto_generate_invoices
            FROM payment_plans
            WHERE payment_plan_id = $1
            "#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(PaymentPlan {
            id: PaymentPlanId::from(row.payment_plan_id),
            law_firm_id: LawFirmId::from(row.law_firm_id),
            client_id: ClientId::from(row.client_id),
            matter_id: MatterId::from(row.matter_id),
            total_amount: money(row.total_amount, &row.currency)?,
            installment_count: row.installment_count as u32,
            installment_amount: money(row.installment_amount, &row.currency)?,
            frequency: parse_frequency(&row.frequency)?,
            first_payment_date: row.first_payment_date,
            grace_period_days: row.grace_period_days as u32,
            late_fee_rate: Rate::new(row.late_fee_rate),
            auto_generate_invoices: row.auto_generate_invoices,
        }))
    }

    #[instrument(skip(self, key))]
    async fn find_invoice(&self, key: &SubjectKey) -> Result<Option<Invoice>, PortError> {
        let row = match *key {
            SubjectKey::SubscriptionPeriod {
                subscription_id,
                period,
            } => {
                sqlx::query_as::<_, InvoiceRow>(
                    r#"
                    SELECT invoice_id, law_firm_id, client_id, invoice_number,
                           invoice_type, subscription_id, period_start, period_end,
                           matter_id, payment_plan_id, installment_number, status,
                           issue_date, due_date, subtotal, tax_amount,
                           discount_amount, total_amount, currency,
                           payment_terms_days, description, created_at, updated_at
                    FROM invoices
                    WHERE subscription_id = $1
                      AND period_start = $2
                      AND period_end = $3
                    "#,
                )
                .bind(Uuid::from(subscription_id))
                .bind(period.start())
                .bind(period.end())
                .fetch_optional(&self.pool)
                .await
                .map_err(db)?
            }
            SubjectKey::PlanInstallment {
                payment_plan_id,
                installment,
            } => {
                sqlx::query_as::<_, InvoiceRow>(
                    r#"
                    SELECT invoice_id, law_firm_id, client_id, invoice_number,
                           invoice_type, subscription_id, period_start, period_end,
                           matter_id, payment_plan_id, installment_number, status,
                           issue_date, due_date, subtotal, tax_amount,
                           discount_amount, total_amount, currency,
                           payment_terms_days, description, created_at, updated_at
                    FROM invoices
                    WHERE payment_plan_id = $1
                      AND installment_number = $2
                    "#,
                )
                .bind(Uuid::from(payment_plan_id))
                .bind(installment as i32)
                .fetch_optional(&self.pool)
                .await
                .map_err(db)?
            }
        };

        row.map(row_to_invoice).transpose()
    }

    #[instrument(skip(self), fields(payment_plan_id = %payment_plan_id))]
    async fn billed_installments(
        &self,
        payment_plan_id: PaymentPlanId,
    ) -> Result<Vec<u32>, PortError> {
        let numbers: Vec<i32> = sqlx::query_scalar(
            r#"
            SELECT installment_number
            FROM invoices
            WHERE payment_plan_id = $1 AND installment_number IS NOT NULL
            ORDER BY installment_number
            "#,
        )
        .bind(Uuid::from(payment_plan_id))
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        Ok(numbers.into_iter().map(|n| n as u32).collect())
    }

    #[instrument(skip(self, invoice), fields(invoice_number = %invoice.invoice_number))]
    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), PortError> {
        debug!("inserting invoice");

        let (subscription_id, period_start, period_end, matter_id, payment_plan_id, installment) =
            match invoice.source {
                InvoiceSource::Subscription {
                    subscription_id,
                    period,
                } => (
                    Some(Uuid::from(subscription_id)),
                    Some(period.start()),
                    Some(period.end()),
                    None,
                    None,
                    None,
                ),
                InvoiceSource::Matter { matter_id } => {
                    (None, None, None, Some(Uuid::from(matter_id)), None, None)
                }
                InvoiceSource::PaymentPlan {
                    payment_plan_id,
                    installment,
                } => (
                    None,
                    None,
                    None,
                    None,
                    Some(Uuid::from(payment_plan_id)),
                    Some(installment as i32),
                ),
            };

        sqlx::query(
            r#"
            INSERT INTO invoices (
                invoice_id, law_firm_id, client_id, invoice_number, invoice_type,
                subscription_id, period_start, period_end, matter_id,
                payment_plan_id, installment_number, status, issue_date, due_date,
                subtotal, tax_amount, discount_amount, total_amount, currency,
                payment_terms_days, description, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, $23
            )
            "#,
        )
        .bind(Uuid::from(invoice.id))
        .bind(Uuid::from(invoice.law_firm_id))
        .bind(Uuid::from(invoice.client_id))
        .bind(&invoice.invoice_number)
        .bind(invoice_type_str(&invoice.source))
        .bind(subscription_id)
        .bind(period_start)
        .bind(period_end)
        .bind(matter_id)
        .bind(payment_plan_id)
        .bind(installment)
        .bind(invoice_status_str(invoice.status))
        .bind(invoice.issue_date)
        .bind(invoice.due_date)
        .bind(invoice.subtotal.amount())
        .bind(invoice.tax_amount.amount())
        .bind(invoice.discount_amount.amount())
        .bind(invoice.total_amount.amount())
        .bind(invoice.subtotal.currency().code())
        .bind(invoice.payment_terms_days as i32)
        .bind(&invoice.description)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db)?;

        Ok(())
    }
}

/// PostgreSQL-backed invoice number allocator
///
/// Sequences are rows in `invoice_number_sequences`, keyed by (prefix,
/// year). The atomic upsert makes allocation safe under concurrency.
#[derive(Debug, Clone)]
pub struct PgInvoiceNumberAllocator {
    pool: PgPool,
}

impl PgInvoiceNumberAllocator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PgInvoiceNumberAllocator {}

#[async_trait]
impl InvoiceNumberAllocator for PgInvoiceNumberAllocator {
    #[instrument(skip(self))]
    async fn next_number(&self, prefix: &str, year: i32) -> Result<String, PortError> {
        let sequence: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO invoice_number_sequences (prefix, year, last_value)
            VALUES ($1, $2, 1)
            ON CONFLICT (prefix, year)
            DO UPDATE SET last_value = invoice_number_sequences.last_value + 1
            RETURNING last_value
            "#,
        )
        .bind(prefix)
        .bind(year)
        .fetch_one(&self.pool)
        .await
        .map_err(db)?;

        Ok(format!("{prefix}-{year}-{sequence:06}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_enum_decoding_accepts_stored_values() {
        assert_eq!(parse_billing_cycle("monthly").unwrap(), BillingCycle::Monthly);
        assert_eq!(parse_billing_method("contingency").unwrap(), BillingMethod::Contingency);
        assert_eq!(parse_frequency("biweekly").unwrap(), PlanFrequency::Biweekly);
        assert_eq!(parse_entry_status("approved").unwrap(), EntryStatus::Approved);
        assert_eq!(parse_invoice_status("draft").unwrap(), InvoiceStatus::Draft);
    }

    #[test]
    fn test_enum_decoding_rejects_unknown_values() {
        assert!(parse_billing_cycle("weekly").is_err());
        assert!(parse_billing_method("flat").is_err());
        assert!(parse_invoice_status("void").is_err());
    }

    #[test]
    fn test_money_decoding_checks_the_currency_code() {
        let ok = money(dec!(1500), "USD").unwrap();
        assert_eq!(ok.currency(), Currency::USD);

        assert!(money(dec!(1500), "XYZ").is_err());
    }

    #[test]
    fn test_invoice_type_tags_follow_the_source() {
        let source = InvoiceSource::Matter {
            matter_id: MatterId::new(),
        };
        assert_eq!(invoice_type_str(&source), "case_billing");
    }
}
