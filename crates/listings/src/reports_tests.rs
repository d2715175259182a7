//! Tests for the listing report filters and pipelines.
//!
//! The builders are pure, so stage composition — order, filters,
//! conversion fallbacks, limits — is asserted directly on the BSON they
//! produce. Cursor behavior is exercised at the integration level.

use mongodb::bson::{Bson, Document, doc};

use super::{
    ListingReportError, australia_two_bedroom_filter, capacity_summary_pipeline,
    large_pet_friendly_pipeline, overbedded_filter, rating_by_government_area_pipeline,
    us_entire_homes_pipeline,
};

/// The single stage document wrapped by `name` (e.g. `$match`).
fn stage<'a>(pipeline: &'a [Document], index: usize, name: &str) -> &'a Document {
    pipeline[index]
        .get_document(name)
        .unwrap_or_else(|_| panic!("stage {index} should be {name}"))
}

#[test]
fn test_australia_filter_contents() {
    let filter = australia_two_bedroom_filter();

    assert_eq!(filter.get_str("address.country"), Ok("Australia"));
    assert_eq!(filter.get_i32("bedrooms"), Ok(2));
    assert_eq!(
        filter.get_document("monthly_price").map(Document::clone),
        Ok(doc! { "$exists": true })
    );
}

#[test]
fn test_overbedded_filter_is_cross_field() {
    let filter = overbedded_filter();

    // The bed/bedroom/capacity comparison must reference fields on both
    // sides, not a literal.
    let expr = filter.get_document("$expr").expect("$expr present");
    let or = expr.get_array("$or").expect("$or present");
    assert_eq!(or.len(), 2);
    assert_eq!(
        or[0],
        Bson::Document(doc! { "$gt": ["$beds", "$bedrooms"] })
    );
    assert_eq!(
        or[1],
        Bson::Document(doc! { "$gt": ["$beds", "$accommodates"] })
    );
}

#[test]
fn test_us_entire_homes_stage_order() {
    let pipeline = us_entire_homes_pipeline();
    assert_eq!(pipeline.len(), 5);

    // Categorical match, then coercion, then numeric match: conversion
    // must happen between the two filters.
    let categorical = stage(&pipeline, 0, "$match");
    assert_eq!(categorical.get_str("address.country_code"), Ok("US"));
    assert_eq!(categorical.get_str("room_type"), Ok("Entire home/apt"));

    let coercion = stage(&pipeline, 1, "$addFields");
    assert!(coercion.contains_key("minimum_nights"));
    assert!(coercion.contains_key("price_num"));

    let numeric = stage(&pipeline, 2, "$match");
    assert_eq!(numeric.get_i32("minimum_nights"), Ok(3));
    assert_eq!(
        numeric.get_document("price_num").map(Document::clone),
        Ok(doc! { "$gte": 700, "$lte": 1000 })
    );

    assert_eq!(stage(&pipeline, 3, "$sort"), &doc! { "price_num": 1 });
    let projection = stage(&pipeline, 4, "$project");
    for field in ["_id", "name", "price", "bedrooms", "number_of_reviews"] {
        assert_eq!(projection.get_i32(field), Ok(1), "missing {field}");
    }
}

#[test]
fn test_us_entire_homes_coercion_is_nonfatal() {
    let pipeline = us_entire_homes_pipeline();
    let coercion = stage(&pipeline, 1, "$addFields");

    for field in ["minimum_nights", "price_num"] {
        let convert = coercion
            .get_document(field)
            .and_then(|d| d.get_document("$convert").map(Document::clone))
            .expect("coercion should go through $convert");
        assert_eq!(convert.get("onError"), Some(&Bson::Null));
        assert_eq!(convert.get("onNull"), Some(&Bson::Null));
    }
}

#[test]
fn test_large_pet_friendly_pipeline() {
    let pipeline = large_pet_friendly_pipeline();
    assert_eq!(pipeline.len(), 5);

    let filter = stage(&pipeline, 0, "$match");
    assert_eq!(
        filter.get_document("bedrooms").map(Document::clone),
        Ok(doc! { "$gte": 6 })
    );
    let amenities = filter
        .get_document("amenities")
        .and_then(|d| d.get_array("$all").cloned())
        .expect("$all amenity filter");
    assert_eq!(
        amenities,
        vec![
            Bson::String("Wifi".to_string()),
            Bson::String("Kitchen".to_string()),
            Bson::String("Pets allowed".to_string()),
        ]
    );

    // Unconvertible prices are dropped, not fatal.
    let guard = stage(&pipeline, 2, "$match");
    assert_eq!(
        guard.get_document("price_num").map(Document::clone),
        Ok(doc! { "$ne": Bson::Null })
    );

    assert_eq!(stage(&pipeline, 3, "$sort"), &doc! { "price_num": 1 });
    let projection = stage(&pipeline, 4, "$project");
    assert_eq!(
        projection.get_document("amenity_count").map(Document::clone),
        Ok(doc! { "$size": "$amenities" })
    );
}

#[test]
fn test_rating_pipeline_groups_then_projects_then_sorts() {
    let pipeline = rating_by_government_area_pipeline();
    assert_eq!(pipeline.len(), 5);

    let filter = stage(&pipeline, 0, "$match");
    assert_eq!(
        filter.get_document("number_of_reviews").map(Document::clone),
        Ok(doc! { "$gte": 10 })
    );
    assert_eq!(
        filter
            .get_document("review_scores.review_scores_rating")
            .map(Document::clone),
        Ok(doc! { "$gte": 80 })
    );
    assert_eq!(
        filter
            .get_document("host.host_response_rate")
            .map(Document::clone),
        Ok(doc! { "$gte": 90 })
    );

    let group = stage(&pipeline, 1, "$group");
    assert_eq!(group.get_str("_id"), Ok("$address.government_area"));

    // The grouping key is renamed and dropped from the output, rounding to
    // two decimals.
    let projection = stage(&pipeline, 2, "$project");
    assert_eq!(projection.get_i32("_id"), Ok(0));
    assert_eq!(projection.get_str("government_area"), Ok("$_id"));
    assert_eq!(
        projection.get_document("avg_rating").map(Document::clone),
        Ok(doc! { "$round": ["$avg_rating", 2] })
    );

    assert_eq!(stage(&pipeline, 3, "$sort"), &doc! { "government_area": 1 });
    assert_eq!(pipeline[4], doc! { "$limit": 5 });
}

#[test]
fn test_capacity_summary_pipeline() {
    let pipeline = capacity_summary_pipeline();
    assert_eq!(pipeline.len(), 7);

    assert_eq!(
        stage(&pipeline, 0, "$match"),
        &doc! { "accommodates": { "$gte": 15 } }
    );

    // Missing cleaning fees become 0.0 before conversion, inside the query.
    let coercion = stage(&pipeline, 1, "$addFields");
    let fee = coercion
        .get_document("cleaning_fee_num")
        .and_then(|d| d.get_document("$convert").map(Document::clone))
        .expect("fee coercion should go through $convert");
    assert_eq!(
        fee.get_document("input").map(Document::clone),
        Ok(doc! { "$ifNull": ["$cleaning_fee", 0.0] })
    );

    let group = stage(&pipeline, 3, "$group");
    assert_eq!(group.get_str("_id"), Ok("$property_type"));
    assert_eq!(
        group.get_document("listing_count").map(Document::clone),
        Ok(doc! { "$sum": 1 })
    );

    // Sort on the unrounded average, then cap, then round in projection.
    assert_eq!(stage(&pipeline, 4, "$sort"), &doc! { "avg_price": -1 });
    assert_eq!(pipeline[5], doc! { "$limit": 5 });
    let projection = stage(&pipeline, 6, "$project");
    assert_eq!(projection.get_i32("_id"), Ok(0));
    assert_eq!(
        projection.get_document("avg_price").map(Document::clone),
        Ok(doc! { "$round": ["$avg_price", 2] })
    );
    assert_eq!(
        projection
            .get_document("avg_cleaning_fee")
            .map(Document::clone),
        Ok(doc! { "$round": ["$avg_cleaning_fee", 2] })
    );
    assert_eq!(projection.get_i32("listing_count"), Ok(1));
}

#[test]
fn test_row_decode_mismatch_is_decode_error() {
    let result: Result<Vec<super::GovernmentAreaRatingRow>, ListingReportError> =
        vec![doc! { "government_area": "Manly", "avg_rating": "not a number" }]
            .into_iter()
            .map(|document| {
                mongodb::bson::from_document(document)
                    .map_err(|err| ListingReportError::Decode(err.to_string()))
            })
            .collect();

    assert!(matches!(result, Err(ListingReportError::Decode(_))));
}
