//! Handlers for the `/warehouses` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use haulage_db::models::warehouse::CreateWarehouse;
use haulage_db::repositories::WarehouseRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireSuperAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/warehouses
///
/// Active warehouses offered for a job's storage leg.
pub async fn list_warehouses(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let warehouses = WarehouseRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: warehouses }))
}

/// POST /api/v1/warehouses
pub async fn create_warehouse(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateWarehouse>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let warehouse = WarehouseRepo::create(&state.pool, &input).await?;
    tracing::info!(
        warehouse_id = warehouse.id,
        created_by = admin.user_id,
        "Warehouse created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: warehouse })))
}
