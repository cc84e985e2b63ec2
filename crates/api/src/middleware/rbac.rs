//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the requirement.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use haulage_core::error::CoreError;
use haulage_core::roles::{can_decide, ROLE_SUPER_ADMIN};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `super_admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireSuperAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_SUPER_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Super admin role required".into(),
            )));
        }
        Ok(RequireSuperAdmin(user))
    }
}

/// Requires `checker` or `super_admin`. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn review_queue(RequireChecker(user): RequireChecker) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireChecker(pub AuthUser);

impl FromRequestParts<AppState> for RequireChecker {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_decide(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Checker or Super Admin role required".into(),
            )));
        }
        Ok(RequireChecker(user))
    }
}
