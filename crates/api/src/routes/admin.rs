//! Route definitions for the `/admin` (curator) resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST   /reset                   -> reset_today
/// GET    /settings                -> get_settings
/// PUT    /settings                -> update_settings
/// GET    /sources                 -> list_sources
/// POST   /sources                 -> create_source
/// DELETE /sources/{id}            -> delete_source
/// POST   /sources/{id}/refresh    -> refresh_source
/// GET    /bans                    -> list_bans
/// POST   /bans                    -> ban_video
/// DELETE /bans/{video_id}         -> unban_video
/// GET    /history                 -> get_history (?date=)
/// GET    /stats/weekly            -> get_weekly_summary
/// POST   /replay                  -> replay
/// POST   /maintenance/purge       -> purge_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reset", post(admin::reset_today))
        .route(
            "/settings",
            get(admin::get_settings).put(admin::update_settings),
        )
        .route(
            "/sources",
            get(admin::list_sources).post(admin::create_source),
        )
        .route("/sources/{id}", delete(admin::delete_source))
        .route("/sources/{id}/refresh", post(admin::refresh_source))
        .route("/bans", get(admin::list_bans).post(admin::ban_video))
        .route("/bans/{video_id}", delete(admin::unban_video))
        .route("/history", get(admin::get_history))
        .route("/stats/weekly", get(admin::get_weekly_summary))
        .route("/replay", post(admin::replay))
        .route("/maintenance/purge", post(admin::purge_history))
}
