//! Billing database layer with `SeaORM` entities and report queries.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the externally-owned billing schema
//! - A repository issuing the fixed read-only billing reports
//!
//! The schema itself (table creation, data loading) is owned by an external
//! process; everything here is read-only.

pub mod entities;
pub mod repositories;

pub use repositories::{
    ActiveAccountRow, ActiveCustomerRow, BillingReportError, BillingReportRepository,
    DeviceContractSummaryRow, InvoicePaymentSummaryRow, UnderfundedContractRow,
};

use sea_orm::{Database, DatabaseConnection};
use tracing::warn;

/// Establishes a connection to the billing database.
///
/// # Errors
///
/// Returns `BillingReportError::Connection` if the connection cannot be
/// established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, BillingReportError> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Runs one operation against a connection scoped to its lifetime.
///
/// The connection is opened immediately before the operation and released
/// on every exit path: closed explicitly once the operation returns, or
/// dropped if the close itself fails.
///
/// # Errors
///
/// Returns the connection error or whatever the operation returns.
pub async fn with_connection<T>(
    database_url: &str,
    op: impl AsyncFnOnce(&DatabaseConnection) -> Result<T, BillingReportError>,
) -> Result<T, BillingReportError> {
    let db = connect(database_url).await?;
    let result = op(&db).await;

    if let Err(err) = db.close().await {
        warn!(error = %err, "failed to close billing connection");
    }

    result
}
