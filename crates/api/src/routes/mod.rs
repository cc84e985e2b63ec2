pub mod admin;
pub mod ai;
pub mod auth;
pub mod health;
pub mod jobs;
pub mod reports;
pub mod warehouses;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
///
/// /admin/users                         list, create (super_admin)
/// /admin/users/{id}                    deactivate (super_admin)
///
/// /warehouses                          list, create
///
/// /jobs                                list, create
/// /jobs/approvals                      review queue (checker, super_admin)
/// /jobs/{id}                           get, edit
/// /jobs/{id}/locations                 replace (draft only)
/// /jobs/{id}/submit|approve|complete|cancel   lifecycle transitions
/// /jobs/{id}/report                    PDF from stored data
/// /jobs/{id}/items                     list, create
/// /jobs/{id}/items/{item_id}           update, delete
///
/// /reports/generate                    PDF from a client snapshot
/// /reports/email                       e-mail a PDF
///
/// /ai/identify-item                    multipart image identification
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/warehouses", warehouses::router())
        .nest("/jobs", jobs::router())
        .nest("/reports", reports::router())
        .nest("/ai", ai::router())
}
