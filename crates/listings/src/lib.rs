//! Document-store layer for the rental listings reports.
//!
//! This crate provides:
//! - A thin connection/collection handle over the listings cluster
//! - A repository issuing the fixed read-only aggregation reports
//! - Fallible numeric coercion for loosely-typed stored fields
//!
//! The collection is owned and populated externally; everything here is
//! read-only.

pub mod coerce;
pub mod reports;

pub use reports::{
    AmenityCountRow, GovernmentAreaRatingRow, ListingReportError, ListingReportRepository,
    MidrangeListingRow, MonthlyPriceRow, OverbeddedListingRow, PropertyTypeSummaryRow,
};

use mongodb::bson::Document;
use mongodb::{Client, Collection};

/// Builds a client for the listings cluster.
///
/// The driver connects lazily; an unreachable cluster surfaces as a
/// connection error on the first operation.
///
/// # Errors
///
/// Returns an error if the connection URI is malformed.
pub async fn connect(uri: &str) -> Result<Client, ListingReportError> {
    Client::with_uri_str(uri).await.map_err(Into::into)
}

/// Handle to the listings collection.
#[must_use]
pub fn listings_collection(
    client: &Client,
    database: &str,
    collection: &str,
) -> Collection<Document> {
    client.database(database).collection(collection)
}

/// Runs one operation against a client scoped to its lifetime.
///
/// The client is built immediately before the operation and shut down on
/// both exit paths once the operation returns.
///
/// # Errors
///
/// Returns the connection error or whatever the operation returns.
pub async fn with_client<T>(
    uri: &str,
    op: impl AsyncFnOnce(&Client) -> Result<T, ListingReportError>,
) -> Result<T, ListingReportError> {
    let client = connect(uri).await?;
    let result = op(&client).await;
    client.shutdown().await;
    result
}
