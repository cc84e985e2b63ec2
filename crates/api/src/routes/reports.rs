//! Route definitions for the `/reports` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Report payloads may carry signature images as data URLs.
const REPORT_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Routes mounted at `/reports`.
///
/// ```text
/// POST /generate   -> generate_report (PDF download)
/// POST /email      -> email_report
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(reports::generate_report))
        .route("/email", post(reports::email_report))
        .layer(DefaultBodyLimit::max(REPORT_BODY_LIMIT))
}
