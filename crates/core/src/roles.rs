//! Well-known role name constants.
//!
//! These must match the `ck_users_role` check constraint in the
//! `create_users` migration.

pub const ROLE_SUPER_ADMIN: &str = "super_admin";
pub const ROLE_CHECKER: &str = "checker";
pub const ROLE_MAKER: &str = "maker";

/// All roles a user may hold.
pub const VALID_ROLES: &[&str] = &[ROLE_SUPER_ADMIN, ROLE_CHECKER, ROLE_MAKER];

/// Whether the role may approve or reject jobs awaiting review.
pub fn can_decide(role: &str) -> bool {
    role == ROLE_CHECKER || role == ROLE_SUPER_ADMIN
}

/// Validate that a role string is one of [`VALID_ROLES`].
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}
