//! Route definitions for the child-facing player.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::child;
use crate::state::AppState;

/// Routes mounted at `/api/v1`.
///
/// ```text
/// GET  /limit                          -> get_limit
/// GET  /videos                         -> get_grid (?maxDuration=)
/// POST /videos/{video_id}/unavailable  -> mark_unavailable
/// POST /watch                          -> record_watch
/// POST /playback/check                 -> check_playback
/// POST /warnings                       -> report_warning
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/limit", get(child::get_limit))
        .route("/videos", get(child::get_grid))
        .route("/videos/{video_id}/unavailable", post(child::mark_unavailable))
        .route("/watch", post(child::record_watch))
        .route("/playback/check", post(child::check_playback))
        .route("/warnings", post(child::report_warning))
}
