//! Integration tests for the listing report repository.
//!
//! These run against a populated listings cluster and are skipped when
//! `MONGODB_URI` is unset. `MONGODB_DATABASE` / `MONGODB_COLLECTION`
//! override the default `sample_airbnb.listingsAndReviews` target.

use tally_listings::ListingReportRepository;

fn mongodb_uri() -> Option<String> {
    std::env::var("MONGODB_URI").ok()
}

async fn repository(uri: &str) -> ListingReportRepository {
    let client = tally_listings::connect(uri)
        .await
        .expect("Failed to build listings client");
    let database =
        std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| "sample_airbnb".to_string());
    let collection =
        std::env::var("MONGODB_COLLECTION").unwrap_or_else(|_| "listingsAndReviews".to_string());

    ListingReportRepository::new(tally_listings::listings_collection(
        &client,
        &database,
        &collection,
    ))
}

#[tokio::test]
async fn test_australia_report_capped_and_sorted() {
    let Some(uri) = mongodb_uri() else { return };
    let repo = repository(&uri).await;

    let rows = repo
        .top_australia_two_bedroom()
        .await
        .expect("Failed to run Australia report");

    assert!(rows.len() <= 3);
    let prices: Vec<f64> = rows
        .iter()
        .map(|row| row.monthly_price_value().expect("numeric monthly price"))
        .collect();
    for pair in prices.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}

#[tokio::test]
async fn test_midrange_report_within_bounds() {
    let Some(uri) = mongodb_uri() else { return };
    let repo = repository(&uri).await;

    let rows = repo
        .us_entire_homes_midrange()
        .await
        .expect("Failed to run midrange report");

    let prices: Vec<f64> = rows
        .iter()
        .map(|row| row.price_value().expect("numeric price"))
        .collect();
    for price in &prices {
        assert!((700.0..=1000.0).contains(price));
    }
    for pair in prices.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
}

#[tokio::test]
async fn test_overbedded_report_cross_field_filter() {
    let Some(uri) = mongodb_uri() else { return };
    let repo = repository(&uri).await;

    let rows = repo
        .overbedded_listings()
        .await
        .expect("Failed to run overbedded report");

    assert!(rows.len() <= 5);
    for row in &rows {
        let beds = row.beds.unwrap_or_default();
        let exceeds_bedrooms = row.bedrooms.is_some_and(|bedrooms| beds > bedrooms);
        let exceeds_capacity = row.accommodates.is_some_and(|capacity| beds > capacity);
        assert!(exceeds_bedrooms || exceeds_capacity);
    }
}

#[tokio::test]
async fn test_amenity_report_sorted_by_numeric_price() {
    let Some(uri) = mongodb_uri() else { return };
    let repo = repository(&uri).await;

    let rows = repo
        .large_pet_friendly_listings()
        .await
        .expect("Failed to run amenity report");

    for row in &rows {
        assert!(row.amenity_count >= 3, "must carry the required amenities");
    }
    let prices: Vec<f64> = rows
        .iter()
        .map(|row| row.price_value().expect("numeric price"))
        .collect();
    for pair in prices.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
}

#[tokio::test]
async fn test_rating_report_capped_and_sorted() {
    let Some(uri) = mongodb_uri() else { return };
    let repo = repository(&uri).await;

    let rows = repo
        .rating_by_government_area()
        .await
        .expect("Failed to run rating report");

    assert!(rows.len() <= 5);
    for pair in rows.windows(2) {
        assert!(pair[0].government_area <= pair[1].government_area);
    }
}

#[tokio::test]
async fn test_capacity_summary_capped_and_sorted() {
    let Some(uri) = mongodb_uri() else { return };
    let repo = repository(&uri).await;

    let rows = repo
        .capacity_summary_by_property_type()
        .await
        .expect("Failed to run capacity summary");

    assert!(rows.len() <= 5);
    for row in &rows {
        assert!(row.listing_count >= 1);
    }
    for pair in rows.windows(2) {
        assert!(pair[0].avg_price >= pair[1].avg_price);
    }
}

#[tokio::test]
async fn test_reports_are_idempotent() {
    let Some(uri) = mongodb_uri() else { return };
    let repo = repository(&uri).await;

    let first = repo
        .rating_by_government_area()
        .await
        .expect("Failed to run rating report");
    let second = repo
        .rating_by_government_area()
        .await
        .expect("Failed to run rating report");
    assert_eq!(first, second);
}
