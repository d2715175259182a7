//! Shared configuration for Tally.
//!
//! This crate provides the configuration types consumed by the report
//! runner: connection settings for the billing database and the listings
//! document store.

pub mod config;

pub use config::{AppConfig, BillingConfig, ListingsConfig};
