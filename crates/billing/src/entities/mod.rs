//! `SeaORM` entity definitions for the billing schema.
//!
//! The tables are owned and populated externally; column names follow the
//! store's mixed-case identifiers via explicit `column_name` mappings.

pub mod accounts;
pub mod contracts;
pub mod customers;
pub mod devices;
pub mod invoices;
pub mod plans;
