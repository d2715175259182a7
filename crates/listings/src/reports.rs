//! Report repository for the fixed listing report queries.
//!
//! Find-shaped reports push filter/projection/sort/limit to the store;
//! pipeline-shaped reports run aggregation stages. Every filter and
//! pipeline is built by a pure function so stage composition is testable
//! without a live cluster. In-pipeline numeric conversion always uses
//! `$convert` with null fallbacks: a document whose field cannot be
//! coerced drops out of the coercion-dependent stage instead of aborting
//! the report.

use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::error::ErrorKind;
use mongodb::{Collection, Cursor};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::coerce;

/// Error types for listing report operations.
#[derive(Debug, thiserror::Error)]
pub enum ListingReportError {
    /// The listings cluster is unreachable.
    #[error("listings store unreachable: {0}")]
    Connection(String),

    /// A filter or pipeline was rejected by the store.
    #[error("listings query failed: {0}")]
    Query(String),

    /// A result document does not match the report's row shape.
    #[error("listings result decode failed: {0}")]
    Decode(String),
}

impl From<mongodb::error::Error> for ListingReportError {
    fn from(err: mongodb::error::Error) -> Self {
        match *err.kind {
            ErrorKind::ServerSelection { ref message, .. } => Self::Connection(message.clone()),
            ErrorKind::Authentication { ref message, .. } => Self::Connection(message.clone()),
            ErrorKind::Io(ref source) => Self::Connection(source.to_string()),
            _ => Self::Query(err.to_string()),
        }
    }
}

/// Row of the top-monthly-price report.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyPriceRow {
    /// Listing id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Listing name.
    #[serde(default)]
    pub name: String,
    /// Monthly price as stored.
    pub monthly_price: Bson,
    /// Property type.
    #[serde(default)]
    pub property_type: String,
}

impl MonthlyPriceRow {
    /// Monthly price as a float, when the stored value is numeric.
    #[must_use]
    pub fn monthly_price_value(&self) -> Option<f64> {
        coerce::bson_f64(&self.monthly_price)
    }
}

/// Row of the US mid-range entire-home report.
#[derive(Debug, Clone, Deserialize)]
pub struct MidrangeListingRow {
    /// Listing id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Listing name.
    #[serde(default)]
    pub name: String,
    /// Nightly price as stored (text in the source data).
    pub price: Bson,
    /// Bedroom count, when present.
    #[serde(default)]
    pub bedrooms: Option<i32>,
    /// Review count, when present.
    #[serde(default)]
    pub number_of_reviews: Option<i32>,
}

impl MidrangeListingRow {
    /// Nightly price as a float, when the stored value is coercible.
    #[must_use]
    pub fn price_value(&self) -> Option<f64> {
        coerce::bson_f64(&self.price)
    }
}

/// Row of the beds-exceeding-bedrooms/capacity report.
#[derive(Debug, Clone, Deserialize)]
pub struct OverbeddedListingRow {
    /// Listing id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Listing name.
    #[serde(default)]
    pub name: String,
    /// Bed count, when present.
    #[serde(default)]
    pub beds: Option<i32>,
    /// Bedroom count, when present.
    #[serde(default)]
    pub bedrooms: Option<i32>,
    /// Guest capacity, when present.
    #[serde(default)]
    pub accommodates: Option<i32>,
    /// Monthly price as stored (kept in the projection for the sort key).
    pub monthly_price: Bson,
}

impl OverbeddedListingRow {
    /// Monthly price as a float, when the stored value is numeric.
    #[must_use]
    pub fn monthly_price_value(&self) -> Option<f64> {
        coerce::bson_f64(&self.monthly_price)
    }
}

/// Row of the large-listings-with-amenities report.
#[derive(Debug, Clone, Deserialize)]
pub struct AmenityCountRow {
    /// Listing id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Listing name.
    #[serde(default)]
    pub name: String,
    /// Nightly price as stored.
    pub price: Bson,
    /// Total number of amenities on the listing.
    pub amenity_count: i32,
}

impl AmenityCountRow {
    /// Nightly price as a float, when the stored value is coercible.
    #[must_use]
    pub fn price_value(&self) -> Option<f64> {
        coerce::bson_f64(&self.price)
    }
}

/// Row of the average-rating-by-government-area report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GovernmentAreaRatingRow {
    /// Government area (grouping key; absent when the source documents had
    /// none).
    #[serde(default)]
    pub government_area: Option<String>,
    /// Mean review score rating, rounded to 2 decimals.
    pub avg_rating: f64,
}

/// Row of the large-capacity summary by property type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PropertyTypeSummaryRow {
    /// Property type (grouping key; absent when the source documents had
    /// none).
    #[serde(default)]
    pub property_type: Option<String>,
    /// Mean nightly price, rounded to 2 decimals.
    pub avg_price: f64,
    /// Mean cleaning fee, rounded to 2 decimals. Missing fees contribute
    /// 0.0; `None` only when no fee in the group was representable at all.
    #[serde(default)]
    pub avg_cleaning_fee: Option<f64>,
    /// Number of listings of this property type.
    pub listing_count: i64,
}

/// Repository for the fixed listing reports.
#[derive(Debug, Clone)]
pub struct ListingReportRepository {
    collection: Collection<Document>,
}

impl ListingReportRepository {
    /// Creates a new listing report repository.
    #[must_use]
    pub const fn new(collection: Collection<Document>) -> Self {
        Self { collection }
    }

    /// Top 3 most expensive 2-bedroom Australian listings by monthly
    /// price, highest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable, rejects the query, or
    /// a result row cannot be decoded.
    pub async fn top_australia_two_bedroom(
        &self,
    ) -> Result<Vec<MonthlyPriceRow>, ListingReportError> {
        let cursor = self
            .collection
            .find(australia_two_bedroom_filter())
            .projection(doc! { "_id": 1, "name": 1, "monthly_price": 1, "property_type": 1 })
            .sort(doc! { "monthly_price": -1 })
            .limit(3)
            .await?;

        rows_from_cursor(cursor).await
    }

    /// US entire homes with a 3-night minimum and a nightly price between
    /// $700 and $1000 inclusive, cheapest first.
    ///
    /// Price and minimum-nights coercion happens after the categorical
    /// match and before the numeric range match; a document whose text
    /// cannot be interpreted numerically simply fails the range.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable, rejects the pipeline,
    /// or a result row cannot be decoded.
    pub async fn us_entire_homes_midrange(
        &self,
    ) -> Result<Vec<MidrangeListingRow>, ListingReportError> {
        let cursor = self.collection.aggregate(us_entire_homes_pipeline()).await?;
        rows_from_cursor(cursor).await
    }

    /// Top 5 listings by monthly price where beds exceed bedrooms or beds
    /// exceed guest capacity (cross-field comparison), highest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable, rejects the query, or
    /// a result row cannot be decoded.
    pub async fn overbedded_listings(
        &self,
    ) -> Result<Vec<OverbeddedListingRow>, ListingReportError> {
        let cursor = self
            .collection
            .find(overbedded_filter())
            .projection(doc! {
                "_id": 1,
                "name": 1,
                "beds": 1,
                "bedrooms": 1,
                "accommodates": 1,
                "monthly_price": 1,
            })
            .sort(doc! { "monthly_price": -1 })
            .limit(5)
            .await?;

        rows_from_cursor(cursor).await
    }

    /// Listings with at least 6 bedrooms carrying Wifi, Kitchen, and
    /// Pets allowed, with their total amenity count, cheapest first by
    /// numeric price.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable, rejects the pipeline,
    /// or a result row cannot be decoded.
    pub async fn large_pet_friendly_listings(
        &self,
    ) -> Result<Vec<AmenityCountRow>, ListingReportError> {
        let cursor = self
            .collection
            .aggregate(large_pet_friendly_pipeline())
            .await?;
        rows_from_cursor(cursor).await
    }

    /// Mean review rating per government area over well-reviewed,
    /// responsive-host listings; first 5 areas in ascending name order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable, rejects the pipeline,
    /// or a result row cannot be decoded.
    pub async fn rating_by_government_area(
        &self,
    ) -> Result<Vec<GovernmentAreaRatingRow>, ListingReportError> {
        let cursor = self
            .collection
            .aggregate(rating_by_government_area_pipeline())
            .await?;
        rows_from_cursor(cursor).await
    }

    /// Price/cleaning-fee/count summary per property type for listings
    /// accommodating 15 or more guests; top 5 by average price.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable, rejects the pipeline,
    /// or a result row cannot be decoded.
    pub async fn capacity_summary_by_property_type(
        &self,
    ) -> Result<Vec<PropertyTypeSummaryRow>, ListingReportError> {
        let cursor = self.collection.aggregate(capacity_summary_pipeline()).await?;
        rows_from_cursor(cursor).await
    }
}

/// Drains a cursor and decodes each document into the report's row type.
async fn rows_from_cursor<T: DeserializeOwned>(
    cursor: Cursor<Document>,
) -> Result<Vec<T>, ListingReportError> {
    let docs: Vec<Document> = cursor.try_collect().await?;
    debug!(rows = docs.len(), "listing report fetched");

    docs.into_iter()
        .map(|document| {
            bson::from_document(document).map_err(|err| ListingReportError::Decode(err.to_string()))
        })
        .collect()
}

// ============================================================================
// Filter & Pipeline Builders
// ============================================================================

/// `$convert` to double, with unrepresentable or missing input mapped to
/// null instead of an aggregation error.
fn to_double_or_null(input: impl Into<Bson>) -> Document {
    doc! {
        "$convert": {
            "input": input.into(),
            "to": "double",
            "onError": Bson::Null,
            "onNull": Bson::Null,
        }
    }
}

/// `$convert` to int, with unrepresentable or missing input mapped to
/// null instead of an aggregation error.
fn to_int_or_null(input: impl Into<Bson>) -> Document {
    doc! {
        "$convert": {
            "input": input.into(),
            "to": "int",
            "onError": Bson::Null,
            "onNull": Bson::Null,
        }
    }
}

pub(crate) fn australia_two_bedroom_filter() -> Document {
    doc! {
        "address.country": "Australia",
        "bedrooms": 2,
        "monthly_price": { "$exists": true },
    }
}

pub(crate) fn overbedded_filter() -> Document {
    doc! {
        "monthly_price": { "$exists": true },
        "$expr": {
            "$or": [
                { "$gt": ["$beds", "$bedrooms"] },
                { "$gt": ["$beds", "$accommodates"] }
            ]
        },
    }
}

pub(crate) fn us_entire_homes_pipeline() -> Vec<Document> {
    vec![
        doc! {
            "$match": {
                "address.country_code": "US",
                "room_type": "Entire home/apt",
            }
        },
        doc! {
            "$addFields": {
                "minimum_nights": to_int_or_null("$minimum_nights"),
                "price_num": to_double_or_null("$price"),
            }
        },
        doc! {
            "$match": {
                "minimum_nights": 3,
                "price_num": { "$gte": 700, "$lte": 1000 },
            }
        },
        doc! { "$sort": { "price_num": 1 } },
        doc! {
            "$project": {
                "_id": 1,
                "name": 1,
                "price": 1,
                "bedrooms": 1,
                "number_of_reviews": 1,
            }
        },
    ]
}

pub(crate) fn large_pet_friendly_pipeline() -> Vec<Document> {
    vec![
        doc! {
            "$match": {
                "bedrooms": { "$gte": 6 },
                "amenities": { "$all": ["Wifi", "Kitchen", "Pets allowed"] },
            }
        },
        doc! { "$addFields": { "price_num": to_double_or_null("$price") } },
        doc! { "$match": { "price_num": { "$ne": Bson::Null } } },
        doc! { "$sort": { "price_num": 1 } },
        doc! {
            "$project": {
                "_id": 1,
                "name": 1,
                "price": 1,
                "amenity_count": { "$size": "$amenities" },
            }
        },
    ]
}

pub(crate) fn rating_by_government_area_pipeline() -> Vec<Document> {
    vec![
        doc! {
            "$match": {
                "number_of_reviews": { "$gte": 10 },
                "review_scores.review_scores_rating": { "$gte": 80 },
                "host.host_response_rate": { "$gte": 90 },
            }
        },
        doc! {
            "$group": {
                "_id": "$address.government_area",
                "avg_rating": { "$avg": "$review_scores.review_scores_rating" },
            }
        },
        doc! {
            "$project": {
                "_id": 0,
                "government_area": "$_id",
                "avg_rating": { "$round": ["$avg_rating", 2] },
            }
        },
        doc! { "$sort": { "government_area": 1 } },
        doc! { "$limit": 5 },
    ]
}

pub(crate) fn capacity_summary_pipeline() -> Vec<Document> {
    vec![
        doc! { "$match": { "accommodates": { "$gte": 15 } } },
        doc! {
            "$addFields": {
                "price_num": to_double_or_null("$price"),
                // Missing or null fees count as 0.0, before conversion.
                "cleaning_fee_num": to_double_or_null(doc! { "$ifNull": ["$cleaning_fee", 0.0] }),
            }
        },
        doc! { "$match": { "price_num": { "$ne": Bson::Null } } },
        doc! {
            "$group": {
                "_id": "$property_type",
                "avg_price": { "$avg": "$price_num" },
                "avg_cleaning_fee": { "$avg": "$cleaning_fee_num" },
                "listing_count": { "$sum": 1 },
            }
        },
        doc! { "$sort": { "avg_price": -1 } },
        doc! { "$limit": 5 },
        doc! {
            "$project": {
                "_id": 0,
                "property_type": "$_id",
                "avg_price": { "$round": ["$avg_price", 2] },
                "avg_cleaning_fee": { "$round": ["$avg_cleaning_fee", 2] },
                "listing_count": 1,
            }
        },
    ]
}

#[cfg(test)]
#[path = "reports_tests.rs"]
mod tests;
