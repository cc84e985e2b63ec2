//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! `&PgPool` (or an open transaction) as the first argument.

pub mod item_repo;
pub mod job_repo;
pub mod location_repo;
pub mod session_repo;
pub mod user_repo;
pub mod warehouse_repo;

pub use item_repo::ItemRepo;
pub use job_repo::JobRepo;
pub use location_repo::LocationRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
pub use warehouse_repo::WarehouseRepo;

/// Maximum page size for list endpoints.
pub const MAX_LIMIT: i64 = 100;

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: i64 = 50;

/// Clamp a requested page size into `1..=MAX_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Negative offsets are treated as zero.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
