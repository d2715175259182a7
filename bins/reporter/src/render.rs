//! Human-readable rendering of report rows to standard output.
//!
//! Column layout is presentation only; field selection, ordering, and
//! limits come from the queries themselves.

use tally_billing::{
    ActiveAccountRow, ActiveCustomerRow, DeviceContractSummaryRow, InvoicePaymentSummaryRow,
    UnderfundedContractRow,
};
use tally_listings::{
    AmenityCountRow, GovernmentAreaRatingRow, MidrangeListingRow, MonthlyPriceRow,
    OverbeddedListingRow, PropertyTypeSummaryRow,
};

fn fmt_money(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn fmt_count(value: Option<i32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn fmt_key(value: Option<&str>) -> &str {
    value.unwrap_or("(none)")
}

/// Customers holding an account with an active contract.
pub fn active_customers(rows: &[ActiveCustomerRow]) {
    println!("Active customers:");
    for row in rows {
        println!(
            "CustomerID: {}, FirstName: {}, LastName: {}, Email: {}",
            row.customer_id, row.first_name, row.last_name, row.email
        );
    }
    println!();
}

/// Top active accounts by balance.
pub fn top_active_accounts(rows: &[ActiveAccountRow]) {
    println!("Top 15 customers with active accounts by balance:");
    for row in rows {
        println!(
            "{} {} {} {} {} {} {} {:.2}",
            row.customer_id,
            row.first_name,
            row.last_name,
            row.email,
            row.account_id,
            row.account_type,
            row.status,
            row.balance
        );
    }
    println!();
}

/// Active contracts whose account balance is below the plan fee.
pub fn underfunded_contracts(rows: &[UnderfundedContractRow]) {
    println!("Active contracts with balance below the monthly fee:");
    for row in rows {
        println!(
            "{} {:.2} {} {:.2}",
            row.plan_name, row.monthly_fee, row.contract_status, row.balance
        );
    }
    println!();
}

/// Per-account device and active-contract counts.
pub fn device_contract_summary(rows: &[DeviceContractSummaryRow]) {
    println!("Device and contract summary for active accounts:");
    println!(
        "CustomerID  CustomerFirstName   CustomerLastName  AccountID   NumDevices  NumActiveContracts"
    );
    for row in rows {
        println!(
            "{:<12}{:<20}{:<18}{:<12}{:<12}{}",
            row.customer_id,
            row.first_name,
            row.last_name,
            row.account_id,
            row.num_devices,
            row.num_active_contracts
        );
    }
    println!();
}

/// Per-account invoice payment totals.
pub fn invoice_payment_summary(rows: &[InvoicePaymentSummaryRow]) {
    println!("=== Invoice Payment Summary by Account ===");
    println!(
        "{:<15} {:<15} {:<15} {:<15} {:<15}",
        "Account ID", "Total Invoiced", "Total Paid", "Total Unpaid", "Overdue Count"
    );
    println!("{}", "-".repeat(80));
    for row in rows {
        println!(
            "{:<15} ${:<14.2} ${:<14.2} ${:<14.2} {:<15}",
            row.account_id, row.total_invoiced, row.total_paid, row.total_unpaid, row.num_overdue
        );
    }
    println!("\nTotal accounts found: {}", rows.len());
    println!();
}

/// Most expensive Australian 2-bedroom listings.
pub fn top_australia_two_bedroom(rows: &[MonthlyPriceRow]) {
    println!("Top Australian 2-bedroom listings by monthly price:");
    for row in rows {
        println!(
            "{} | {} | monthly_price: {} | {}",
            row.id,
            row.name,
            fmt_money(row.monthly_price_value()),
            row.property_type
        );
    }
    println!();
}

/// US entire homes in the $700-$1000 range with a 3-night minimum.
pub fn us_entire_homes_midrange(rows: &[MidrangeListingRow]) {
    println!("US entire homes, 3-night minimum, $700-$1000 per night:");
    for row in rows {
        println!(
            "{} | {} | price: {} | bedrooms: {} | reviews: {}",
            row.id,
            row.name,
            fmt_money(row.price_value()),
            fmt_count(row.bedrooms),
            fmt_count(row.number_of_reviews)
        );
    }
    println!();
}

/// Listings where beds exceed bedrooms or guest capacity.
pub fn overbedded_listings(rows: &[OverbeddedListingRow]) {
    println!("Listings with more beds than bedrooms or capacity:");
    for row in rows {
        println!(
            "{} | {} | beds: {} | bedrooms: {} | accommodates: {} | monthly_price: {}",
            row.id,
            row.name,
            fmt_count(row.beds),
            fmt_count(row.bedrooms),
            fmt_count(row.accommodates),
            fmt_money(row.monthly_price_value())
        );
    }
    println!();
}

/// Large listings carrying the required amenity set.
pub fn large_pet_friendly_listings(rows: &[AmenityCountRow]) {
    println!("Listings with 6+ bedrooms, Wifi, Kitchen, and Pets allowed:");
    for row in rows {
        println!(
            "{} | {} | price: {} | amenities: {}",
            row.id,
            row.name,
            fmt_money(row.price_value()),
            row.amenity_count
        );
    }
    println!();
}

/// Mean review rating per government area.
pub fn rating_by_government_area(rows: &[GovernmentAreaRatingRow]) {
    println!("Average review rating by government area:");
    for row in rows {
        println!(
            "{:<45} {:>8.2}",
            fmt_key(row.government_area.as_deref()),
            row.avg_rating
        );
    }
    println!();
}

/// Price and cleaning-fee summary per property type.
pub fn capacity_summary_by_property_type(rows: &[PropertyTypeSummaryRow]) {
    println!("Large-capacity listings summary by property type:");
    println!(
        "{:<25} {:>12} {:>18} {:>10}",
        "Property Type", "Avg Price", "Avg Cleaning Fee", "Listings"
    );
    for row in rows {
        println!(
            "{:<25} {:>12.2} {:>18} {:>10}",
            fmt_key(row.property_type.as_deref()),
            row.avg_price,
            fmt_money(row.avg_cleaning_fee),
            row.listing_count
        );
    }
    println!();
}
