//! Handlers for items nested under `/jobs/{id}/items`.
//!
//! Item writes are last-write-wins and never change the job's status.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use haulage_core::error::CoreError;
use haulage_core::types::DbId;
use haulage_db::models::item::{CreateItem, UpdateItem};
use haulage_db::repositories::{ItemRepo, JobRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_job_exists(state: &AppState, job_id: DbId) -> AppResult<()> {
    JobRepo::find_by_id(&state.pool, job_id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }))
}

fn item_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Item", id })
}

/// GET /api/v1/jobs/{id}/items
pub async fn list_items(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_job_exists(&state, job_id).await?;
    let items = ItemRepo::list_for_job(&state.pool, job_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/jobs/{id}/items
///
/// Add an item. Items below the AI confidence threshold are flagged for
/// manual verification.
pub async fn create_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    Json(input): Json<CreateItem>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_job_exists(&state, job_id).await?;

    let item = ItemRepo::create(&state.pool, job_id, auth.user_id, &input).await?;
    tracing::info!(
        job_id,
        item_id = item.id,
        user_id = auth.user_id,
        manual_verification = item.manual_verification,
        "Item added",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PUT /api/v1/jobs/{id}/items/{item_id}
pub async fn update_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((job_id, item_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateItem>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let item = ItemRepo::update(&state.pool, job_id, item_id, &input)
        .await?
        .ok_or_else(|| item_not_found(item_id))?;

    tracing::info!(job_id, item_id, user_id = auth.user_id, "Item updated");
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/jobs/{id}/items/{item_id}
pub async fn delete_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((job_id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if !ItemRepo::delete(&state.pool, job_id, item_id).await? {
        return Err(item_not_found(item_id));
    }
    tracing::info!(job_id, item_id, user_id = auth.user_id, "Item deleted");
    Ok(StatusCode::NO_CONTENT)
}
