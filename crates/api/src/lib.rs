//! Haulage API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! report delivery, vision client) so integration tests and the binary
//! entrypoint can both access them.

pub mod auth;
pub mod config;
pub mod delivery;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod routes;
pub mod state;
pub mod vision;
