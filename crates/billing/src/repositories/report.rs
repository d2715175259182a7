//! Report repository for the fixed billing report queries.
//!
//! All five reports are read-only, parameter-free, and single-shot: no
//! retries, no pagination. Joins, filters, ordering, and limits are pushed
//! to the store; the two per-account summaries pull the joined rows once
//! and aggregate them with pure helpers kept testable without a database.

use std::collections::{BTreeMap, BTreeSet};

use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Select,
};
use tracing::debug;

use crate::entities::{accounts, contracts, customers, devices, invoices, plans};

/// Status value marking a live account or contract.
const STATUS_ACTIVE: &str = "active";
/// Invoice status values used by the payment summary.
const INVOICE_PAID: &str = "paid";
const INVOICE_UNPAID: &str = "unpaid";
const INVOICE_OVERDUE: &str = "overdue";

/// Error types for billing report operations.
#[derive(Debug, thiserror::Error)]
pub enum BillingReportError {
    /// The billing store is unreachable.
    #[error("billing store unreachable: {0}")]
    Connection(String),

    /// A query failed against the live schema (missing column/table,
    /// malformed statement).
    #[error("billing query failed: {0}")]
    Query(String),
}

impl From<DbErr> for BillingReportError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::Conn(source) => Self::Connection(source.to_string()),
            DbErr::ConnectionAcquire(source) => Self::Connection(source.to_string()),
            other => Self::Query(other.to_string()),
        }
    }
}

/// Row of the active-customers report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveCustomerRow {
    /// Customer ID.
    pub customer_id: String,
    /// Customer first name.
    pub first_name: String,
    /// Customer last name.
    pub last_name: String,
    /// Customer email.
    pub email: String,
}

/// Row of the top-active-accounts report.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveAccountRow {
    /// Customer ID.
    pub customer_id: String,
    /// Customer first name.
    pub first_name: String,
    /// Customer last name.
    pub last_name: String,
    /// Customer email.
    pub email: String,
    /// Account ID.
    pub account_id: String,
    /// Account type (Mobile, Internet, Wireless).
    pub account_type: String,
    /// Account status.
    pub status: String,
    /// Account balance.
    pub balance: f64,
}

/// Row of the under-funded-contracts report.
#[derive(Debug, Clone, PartialEq)]
pub struct UnderfundedContractRow {
    /// Plan name.
    pub plan_name: String,
    /// Plan monthly fee.
    pub monthly_fee: f64,
    /// Contract status.
    pub contract_status: String,
    /// Account balance.
    pub balance: f64,
}

/// One joined (customer, account, device, contract) row, before grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceContractJoinRow {
    /// Customer ID.
    pub customer_id: String,
    /// Customer first name.
    pub first_name: String,
    /// Customer last name.
    pub last_name: String,
    /// Account ID.
    pub account_id: String,
    /// Device ID.
    pub device_id: String,
    /// Contract ID.
    pub contract_id: String,
}

/// Row of the per-account device/contract summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceContractSummaryRow {
    /// Customer ID.
    pub customer_id: String,
    /// Customer first name.
    pub first_name: String,
    /// Customer last name.
    pub last_name: String,
    /// Account ID.
    pub account_id: String,
    /// Device occurrences over the device x contract join. A device is
    /// counted once per matching active contract.
    pub num_devices: usize,
    /// Count of distinct active contracts on the account.
    pub num_active_contracts: usize,
}

/// One joined (account, invoice) row, before grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceJoinRow {
    /// Account ID.
    pub account_id: String,
    /// Invoice amount.
    pub amount: f64,
    /// Invoice status (paid, unpaid, overdue, canceled).
    pub status: String,
}

/// Row of the per-account invoice payment summary.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoicePaymentSummaryRow {
    /// Account ID.
    pub account_id: String,
    /// Sum of all invoice amounts on the account.
    pub total_invoiced: f64,
    /// Sum of amounts of paid invoices.
    pub total_paid: f64,
    /// Sum of amounts of unpaid invoices.
    pub total_unpaid: f64,
    /// Count of overdue invoices.
    pub num_overdue: usize,
}

/// Repository for the fixed billing reports.
#[derive(Debug, Clone)]
pub struct BillingReportRepository {
    db: DatabaseConnection,
}

impl BillingReportRepository {
    /// Creates a new billing report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Customers holding at least one account with an active contract.
    ///
    /// Inner-joins customer, account, and contract; a customer appears
    /// once per matching (account, contract) pair, in store-defined order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or the query fails.
    pub async fn active_customers(&self) -> Result<Vec<ActiveCustomerRow>, BillingReportError> {
        let rows: Vec<(String, String, String, String)> = active_customers_query()
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(customer_id, first_name, last_name, email)| ActiveCustomerRow {
                    customer_id,
                    first_name,
                    last_name,
                    email,
                },
            )
            .collect())
    }

    /// Top 15 active accounts by balance, highest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or the query fails.
    pub async fn top_active_accounts(&self) -> Result<Vec<ActiveAccountRow>, BillingReportError> {
        let rows: Vec<(String, String, String, String, String, String, String, f64)> =
            top_active_accounts_query()
                .into_tuple()
                .all(&self.db)
                .await?;

        Ok(rows
            .into_iter()
            .map(
                |(
                    customer_id,
                    first_name,
                    last_name,
                    email,
                    account_id,
                    account_type,
                    status,
                    balance,
                )| ActiveAccountRow {
                    customer_id,
                    first_name,
                    last_name,
                    email,
                    account_id,
                    account_type,
                    status,
                    balance,
                },
            )
            .collect())
    }

    /// Active contracts whose account balance no longer covers the plan's
    /// monthly fee, highest balance first.
    ///
    /// The balance/fee comparison is a column-to-column predicate pushed to
    /// the store, not a comparison against a literal.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or the query fails.
    pub async fn underfunded_contracts(
        &self,
    ) -> Result<Vec<UnderfundedContractRow>, BillingReportError> {
        let rows: Vec<(String, f64, String, f64)> = underfunded_contracts_query()
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(plan_name, monthly_fee, contract_status, balance)| UnderfundedContractRow {
                    plan_name,
                    monthly_fee,
                    contract_status,
                    balance,
                },
            )
            .collect())
    }

    /// Per-account device and active-contract counts for active accounts,
    /// most devices first, then most contracts.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or the query fails.
    pub async fn device_contract_summary(
        &self,
    ) -> Result<Vec<DeviceContractSummaryRow>, BillingReportError> {
        let rows: Vec<(String, String, String, String, String, String)> =
            device_contract_join_query()
                .into_tuple()
                .all(&self.db)
                .await?;

        debug!(joined_rows = rows.len(), "device/contract summary fetched");

        let rows: Vec<DeviceContractJoinRow> = rows
            .into_iter()
            .map(
                |(customer_id, first_name, last_name, account_id, device_id, contract_id)| {
                    DeviceContractJoinRow {
                        customer_id,
                        first_name,
                        last_name,
                        account_id,
                        device_id,
                        contract_id,
                    }
                },
            )
            .collect();

        Ok(summarize_devices(&rows))
    }

    /// Per-account invoice totals with paid/unpaid conditional sums and an
    /// overdue count, largest unpaid total first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or the query fails.
    pub async fn invoice_payment_summary(
        &self,
    ) -> Result<Vec<InvoicePaymentSummaryRow>, BillingReportError> {
        let rows: Vec<(String, f64, String)> =
            invoice_join_query().into_tuple().all(&self.db).await?;

        debug!(joined_rows = rows.len(), "invoice payment summary fetched");

        let rows: Vec<InvoiceJoinRow> = rows
            .into_iter()
            .map(|(account_id, amount, status)| InvoiceJoinRow {
                account_id,
                amount,
                status,
            })
            .collect();

        Ok(summarize_invoices(&rows))
    }
}

// ============================================================================
// Query Builders
// ============================================================================
// Pure select composition, so join/filter/order/limit shape is testable on
// the generated statement without a database.

pub(crate) fn active_customers_query() -> Select<customers::Entity> {
    customers::Entity::find()
        .join(JoinType::InnerJoin, customers::Relation::Accounts.def())
        .join(JoinType::InnerJoin, accounts::Relation::Contracts.def())
        .filter(contracts::Column::Status.eq(STATUS_ACTIVE))
        .select_only()
        .column(customers::Column::Id)
        .column(customers::Column::FirstName)
        .column(customers::Column::LastName)
        .column(customers::Column::Email)
}

pub(crate) fn top_active_accounts_query() -> Select<customers::Entity> {
    customers::Entity::find()
        .join(JoinType::InnerJoin, customers::Relation::Accounts.def())
        .filter(accounts::Column::Status.eq(STATUS_ACTIVE))
        .order_by_desc(accounts::Column::Balance)
        .limit(15)
        .select_only()
        .column(customers::Column::Id)
        .column(customers::Column::FirstName)
        .column(customers::Column::LastName)
        .column(customers::Column::Email)
        .column(accounts::Column::Id)
        .column(accounts::Column::AccountType)
        .column(accounts::Column::Status)
        .column(accounts::Column::Balance)
}

pub(crate) fn underfunded_contracts_query() -> Select<plans::Entity> {
    plans::Entity::find()
        .join(JoinType::InnerJoin, plans::Relation::Contracts.def())
        .join(JoinType::InnerJoin, contracts::Relation::Accounts.def())
        .filter(contracts::Column::Status.eq(STATUS_ACTIVE))
        .filter(
            Expr::col((accounts::Entity, accounts::Column::Balance))
                .lt(Expr::col((plans::Entity, plans::Column::MonthlyFee))),
        )
        .order_by_desc(accounts::Column::Balance)
        .select_only()
        .column(plans::Column::Name)
        .column(plans::Column::MonthlyFee)
        .column(contracts::Column::Status)
        .column(accounts::Column::Balance)
}

pub(crate) fn device_contract_join_query() -> Select<customers::Entity> {
    customers::Entity::find()
        .join(JoinType::InnerJoin, customers::Relation::Accounts.def())
        .join(JoinType::InnerJoin, accounts::Relation::Devices.def())
        .join(JoinType::InnerJoin, accounts::Relation::Contracts.def())
        .filter(accounts::Column::Status.eq(STATUS_ACTIVE))
        .filter(contracts::Column::Status.eq(STATUS_ACTIVE))
        .select_only()
        .column(customers::Column::Id)
        .column(customers::Column::FirstName)
        .column(customers::Column::LastName)
        .column(accounts::Column::Id)
        .column(devices::Column::Id)
        .column(contracts::Column::Id)
}

pub(crate) fn invoice_join_query() -> Select<accounts::Entity> {
    accounts::Entity::find()
        .join(JoinType::InnerJoin, accounts::Relation::Invoices.def())
        .select_only()
        .column(accounts::Column::Id)
        .column(invoices::Column::Amount)
        .column(invoices::Column::Status)
}

// ============================================================================
// Aggregation Helpers
// ============================================================================

/// Groups joined device/contract rows per (customer, account).
///
/// `num_devices` counts joined rows, so a device contributes once per
/// matching active contract; `num_active_contracts` deduplicates contract
/// ids. Sorted by device count descending, then contract count descending,
/// then account id for a stable output.
#[must_use]
pub fn summarize_devices(rows: &[DeviceContractJoinRow]) -> Vec<DeviceContractSummaryRow> {
    let mut groups: BTreeMap<(String, String, String, String), (usize, BTreeSet<String>)> =
        BTreeMap::new();

    for row in rows {
        let key = (
            row.customer_id.clone(),
            row.first_name.clone(),
            row.last_name.clone(),
            row.account_id.clone(),
        );
        let entry = groups.entry(key).or_default();
        entry.0 += 1;
        entry.1.insert(row.contract_id.clone());
    }

    let mut summary: Vec<DeviceContractSummaryRow> = groups
        .into_iter()
        .map(
            |((customer_id, first_name, last_name, account_id), (num_devices, contract_ids))| {
                DeviceContractSummaryRow {
                    customer_id,
                    first_name,
                    last_name,
                    account_id,
                    num_devices,
                    num_active_contracts: contract_ids.len(),
                }
            },
        )
        .collect();

    summary.sort_by(|a, b| {
        b.num_devices
            .cmp(&a.num_devices)
            .then(b.num_active_contracts.cmp(&a.num_active_contracts))
            .then_with(|| a.account_id.cmp(&b.account_id))
    });

    summary
}

/// Groups joined invoice rows per account.
///
/// Every invoice contributes to `total_invoiced`; only matching statuses
/// contribute to the conditional sums (canceled invoices count toward the
/// total alone). Sorted by unpaid total descending, then account id.
#[must_use]
pub fn summarize_invoices(rows: &[InvoiceJoinRow]) -> Vec<InvoicePaymentSummaryRow> {
    let mut groups: BTreeMap<String, (f64, f64, f64, usize)> = BTreeMap::new();

    for row in rows {
        let entry = groups.entry(row.account_id.clone()).or_default();
        entry.0 += row.amount;
        match row.status.as_str() {
            INVOICE_PAID => entry.1 += row.amount,
            INVOICE_UNPAID => entry.2 += row.amount,
            INVOICE_OVERDUE => entry.3 += 1,
            _ => {}
        }
    }

    let mut summary: Vec<InvoicePaymentSummaryRow> = groups
        .into_iter()
        .map(
            |(account_id, (total_invoiced, total_paid, total_unpaid, num_overdue))| {
                InvoicePaymentSummaryRow {
                    account_id,
                    total_invoiced,
                    total_paid,
                    total_unpaid,
                    num_overdue,
                }
            },
        )
        .collect();

    summary.sort_by(|a, b| {
        b.total_unpaid
            .total_cmp(&a.total_unpaid)
            .then_with(|| a.account_id.cmp(&b.account_id))
    });

    summary
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
