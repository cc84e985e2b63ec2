//! Route definitions for the `/ai` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use haulage_core::identification::MAX_TOTAL_BYTES;

use crate::handlers::identify;
use crate::state::AppState;

/// Headroom over the image limit for multipart framing and text fields.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Routes mounted at `/ai`.
///
/// ```text
/// POST /identify-item   -> identify_item (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/identify-item", post(identify::identify_item))
        .layer(DefaultBodyLimit::max(MAX_TOTAL_BYTES + MULTIPART_OVERHEAD))
}
