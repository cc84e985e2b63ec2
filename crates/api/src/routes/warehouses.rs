//! Route definitions for the `/warehouses` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::warehouses;
use crate::state::AppState;

/// Routes mounted at `/warehouses`.
///
/// ```text
/// GET    /   -> list_warehouses
/// POST   /   -> create_warehouse (super_admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(warehouses::list_warehouses).post(warehouses::create_warehouse),
    )
}
