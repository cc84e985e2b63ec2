//! Sign-in for crew accounts. Every other group sits behind the bearer
//! token these routes hand out.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// ```text
/// POST /login    -> login    (locks the account after repeated failures)
/// POST /refresh  -> refresh  (one-shot: the presented session is revoked)
/// POST /logout   -> logout   (bearer token; revokes all of the user's sessions)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
}
