//! Handlers for the `/admin` resource (user management).
//!
//! All handlers require the `super_admin` role via [`RequireSuperAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use haulage_core::error::CoreError;
use haulage_core::roles::{validate_role, ROLE_SUPER_ADMIN};
use haulage_core::types::DbId;
use haulage_db::models::user::{CreateUser, NewUserRequest, UserResponse};
use haulage_db::repositories::{SessionRepo, UserRepo};
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireSuperAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/admin/users
///
/// Create a user with a role. Validates the payload and password strength,
/// hashes the password, and returns a safe [`UserResponse`] with 201 Created.
pub async fn create_user(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Json(input): Json<NewUserRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_role(&input.role).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create_dto = CreateUser {
        username: input.username.trim().to_string(),
        email: input.email.trim().to_lowercase(),
        full_name: input.full_name,
        password_hash: hashed,
        role: input.role,
    };

    let user = UserRepo::create(&state.pool, &create_dto).await?;
    tracing::info!(
        user_id = user.id,
        role = %user.role,
        created_by = admin.user_id,
        "User created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list(&state.pool).await?;
    let data: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Soft-deactivate a user and revoke their refresh sessions. Access tokens
/// already issued run out on their own. Super admins cannot be deactivated.
/// Returns 204 No Content.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    if user.role == ROLE_SUPER_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "Super admin accounts cannot be deactivated".into(),
        )));
    }

    if !UserRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "User is already inactive".into(),
        )));
    }

    let revoked = SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    tracing::info!(
        user_id = id,
        deactivated_by = admin.user_id,
        revoked_sessions = revoked,
        "User deactivated",
    );
    Ok(StatusCode::NO_CONTENT)
}
