//! Domain logic for the Haulage inventory service.
//!
//! Everything in this crate is pure: no database access, no network calls.
//! The DB and API crates feed snapshots in and apply the results.

pub mod catalog;
pub mod currency;
pub mod error;
pub mod identification;
pub mod inventory;
pub mod job_lifecycle;
pub mod job_number;
pub mod locations;
pub mod recipients;
pub mod report;
pub mod roles;
pub mod types;
