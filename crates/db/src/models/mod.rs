//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts, validated with `validator`
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod item;
pub mod job;
pub mod location;
pub mod session;
pub mod user;
pub mod warehouse;
