pub mod admin;
pub mod child;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /limit                                  daily-limit state (GET)
/// /videos                                 child grid (GET, ?maxDuration=)
/// /videos/{video_id}/unavailable          mark unavailable (POST)
/// /watch                                  record watch (POST)
/// /playback/check                         interruption check (POST)
/// /warnings                               player countdown warning (POST)
///
/// /admin/reset                            reset today's budget (POST)
/// /admin/settings                         get, update (GET, PUT)
/// /admin/sources                          list, create (GET, POST)
/// /admin/sources/{id}                     delete (DELETE)
/// /admin/sources/{id}/refresh             ingest refreshed videos (POST)
/// /admin/bans                             list, ban (GET, POST)
/// /admin/bans/{video_id}                  unban (DELETE)
/// /admin/history                          watch events of a day (GET, ?date=)
/// /admin/stats/weekly                     last seven days (GET)
/// /admin/replay                           curator replay (POST)
/// /admin/maintenance/purge                purge old history (POST)
/// ```
///
/// Authentication of `/admin` is the outer layer's job.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(child::router())
        .nest("/admin", admin::router())
}
