//! Tally report runner.
//!
//! Runs the fixed billing and listings reports sequentially, top to
//! bottom. Every report opens its own scoped store connection and releases
//! it when done, success or failure. A failed report is logged and does
//! not stop the remaining reports; the process exits non-zero if any
//! report failed.

use anyhow::bail;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_billing::BillingReportRepository;
use tally_listings::ListingReportRepository;
use tally_shared::{AppConfig, BillingConfig, ListingsConfig};

mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing; report output goes to stdout, diagnostics to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::load()?;

    let mut failed = 0_usize;
    failed += run_billing_reports(&config.billing).await;
    failed += run_listing_reports(&config.listings).await;

    if failed > 0 {
        bail!("{failed} report(s) failed");
    }

    info!("all reports completed");
    Ok(())
}

/// Runs the five billing reports, each on its own scoped connection.
/// Returns the number of failed reports.
async fn run_billing_reports(config: &BillingConfig) -> usize {
    let mut failed = 0;

    info!(report = "active_customers", "running billing report");
    match tally_billing::with_connection(&config.url, async |db| {
        BillingReportRepository::new(db.clone())
            .active_customers()
            .await
    })
    .await
    {
        Ok(rows) => render::active_customers(&rows),
        Err(err) => {
            error!(report = "active_customers", error = %err, "billing report failed");
            failed += 1;
        }
    }

    info!(report = "top_active_accounts", "running billing report");
    match tally_billing::with_connection(&config.url, async |db| {
        BillingReportRepository::new(db.clone())
            .top_active_accounts()
            .await
    })
    .await
    {
        Ok(rows) => render::top_active_accounts(&rows),
        Err(err) => {
            error!(report = "top_active_accounts", error = %err, "billing report failed");
            failed += 1;
        }
    }

    info!(report = "underfunded_contracts", "running billing report");
    match tally_billing::with_connection(&config.url, async |db| {
        BillingReportRepository::new(db.clone())
            .underfunded_contracts()
            .await
    })
    .await
    {
        Ok(rows) => render::underfunded_contracts(&rows),
        Err(err) => {
            error!(report = "underfunded_contracts", error = %err, "billing report failed");
            failed += 1;
        }
    }

    info!(report = "device_contract_summary", "running billing report");
    match tally_billing::with_connection(&config.url, async |db| {
        BillingReportRepository::new(db.clone())
            .device_contract_summary()
            .await
    })
    .await
    {
        Ok(rows) => render::device_contract_summary(&rows),
        Err(err) => {
            error!(report = "device_contract_summary", error = %err, "billing report failed");
            failed += 1;
        }
    }

    info!(report = "invoice_payment_summary", "running billing report");
    match tally_billing::with_connection(&config.url, async |db| {
        BillingReportRepository::new(db.clone())
            .invoice_payment_summary()
            .await
    })
    .await
    {
        Ok(rows) => render::invoice_payment_summary(&rows),
        Err(err) => {
            error!(report = "invoice_payment_summary", error = %err, "billing report failed");
            failed += 1;
        }
    }

    failed
}

/// Runs the six listings reports, each on its own scoped client.
/// Returns the number of failed reports.
async fn run_listing_reports(config: &ListingsConfig) -> usize {
    let mut failed = 0;

    info!(report = "top_australia_two_bedroom", "running listings report");
    match tally_listings::with_client(&config.uri, async |client| {
        listing_repository(client, config)
            .top_australia_two_bedroom()
            .await
    })
    .await
    {
        Ok(rows) => render::top_australia_two_bedroom(&rows),
        Err(err) => {
            error!(report = "top_australia_two_bedroom", error = %err, "listings report failed");
            failed += 1;
        }
    }

    info!(report = "us_entire_homes_midrange", "running listings report");
    match tally_listings::with_client(&config.uri, async |client| {
        listing_repository(client, config)
            .us_entire_homes_midrange()
            .await
    })
    .await
    {
        Ok(rows) => render::us_entire_homes_midrange(&rows),
        Err(err) => {
            error!(report = "us_entire_homes_midrange", error = %err, "listings report failed");
            failed += 1;
        }
    }

    info!(report = "overbedded_listings", "running listings report");
    match tally_listings::with_client(&config.uri, async |client| {
        listing_repository(client, config).overbedded_listings().await
    })
    .await
    {
        Ok(rows) => render::overbedded_listings(&rows),
        Err(err) => {
            error!(report = "overbedded_listings", error = %err, "listings report failed");
            failed += 1;
        }
    }

    info!(report = "large_pet_friendly_listings", "running listings report");
    match tally_listings::with_client(&config.uri, async |client| {
        listing_repository(client, config)
            .large_pet_friendly_listings()
            .await
    })
    .await
    {
        Ok(rows) => render::large_pet_friendly_listings(&rows),
        Err(err) => {
            error!(report = "large_pet_friendly_listings", error = %err, "listings report failed");
            failed += 1;
        }
    }

    info!(report = "rating_by_government_area", "running listings report");
    match tally_listings::with_client(&config.uri, async |client| {
        listing_repository(client, config)
            .rating_by_government_area()
            .await
    })
    .await
    {
        Ok(rows) => render::rating_by_government_area(&rows),
        Err(err) => {
            error!(report = "rating_by_government_area", error = %err, "listings report failed");
            failed += 1;
        }
    }

    info!(
        report = "capacity_summary_by_property_type",
        "running listings report"
    );
    match tally_listings::with_client(&config.uri, async |client| {
        listing_repository(client, config)
            .capacity_summary_by_property_type()
            .await
    })
    .await
    {
        Ok(rows) => render::capacity_summary_by_property_type(&rows),
        Err(err) => {
            error!(
                report = "capacity_summary_by_property_type",
                error = %err,
                "listings report failed"
            );
            failed += 1;
        }
    }

    failed
}

fn listing_repository(
    client: &mongodb::Client,
    config: &ListingsConfig,
) -> ListingReportRepository {
    ListingReportRepository::new(tally_listings::listings_collection(
        client,
        &config.database,
        &config.collection,
    ))
}
