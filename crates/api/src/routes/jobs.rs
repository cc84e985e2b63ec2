//! Route definitions for the `/jobs` resource and its nested items.
//!
//! All endpoints require authentication.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{items, jobs};
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// GET    /                       -> list_jobs
/// POST   /                       -> create_job
/// GET    /approvals              -> list_pending_review (checker, super_admin)
/// GET    /{id}                   -> get_job
/// PUT    /{id}                   -> update_job (draft only)
/// PUT    /{id}/locations         -> replace_locations (draft only)
/// POST   /{id}/submit            -> submit_job
/// POST   /{id}/approve           -> decide_job (approve | reject)
/// POST   /{id}/complete          -> complete_job
/// POST   /{id}/cancel            -> cancel_job
/// GET    /{id}/report            -> job_report (?type=)
/// GET    /{id}/items             -> list_items
/// POST   /{id}/items             -> create_item
/// PUT    /{id}/items/{item_id}   -> update_item
/// DELETE /{id}/items/{item_id}   -> delete_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(jobs::list_jobs).post(jobs::create_job))
        .route("/approvals", get(jobs::list_pending_review))
        .route("/{id}", get(jobs::get_job).put(jobs::update_job))
        .route("/{id}/locations", put(jobs::replace_locations))
        .route("/{id}/submit", post(jobs::submit_job))
        .route("/{id}/approve", post(jobs::decide_job))
        .route("/{id}/complete", post(jobs::complete_job))
        .route("/{id}/cancel", post(jobs::cancel_job))
        .route("/{id}/report", get(jobs::job_report))
        .route("/{id}/items", get(items::list_items).post(items::create_item))
        .route(
            "/{id}/items/{item_id}",
            put(items::update_item).delete(items::delete_item),
        )
}
