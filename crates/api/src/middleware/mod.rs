//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- The authenticated user from a JWT Bearer token.
//! - [`rbac::RequireSuperAdmin`] -- Requires the `super_admin` role.
//! - [`rbac::RequireChecker`] -- Requires a role that may decide approvals.

pub mod auth;
pub mod rbac;
