//! Request handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod identify;
pub mod items;
pub mod jobs;
pub mod reports;
pub mod warehouses;
