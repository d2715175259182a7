//! Repository abstractions for billing data access.
//!
//! Repositories provide a clean interface for the fixed report queries,
//! hiding the `SeaORM` implementation details from the rest of the
//! application.

pub mod report;

pub use report::{
    ActiveAccountRow, ActiveCustomerRow, BillingReportError, BillingReportRepository,
    DeviceContractSummaryRow, InvoicePaymentSummaryRow, UnderfundedContractRow,
};
