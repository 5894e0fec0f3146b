//! Handlers for the child-facing player endpoints.
//!
//! The response shapes here are consumed by the player verbatim, so they do
//! not use the `{ "data": ... }` envelope.

use axum::extract::{Path, Query, State};
use axum::Json;
use kidscreen_core::daily_limit::DailyLimit;
use kidscreen_session::{Grid, PlaybackCheck, RecordWatch};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::WatchResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Query parameters for the grid endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridQuery {
    /// Optional cap on video duration, in seconds.
    pub max_duration: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackCheckRequest {
    pub video_duration_seconds: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningRequest {
    pub warning_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableResponse {
    pub success: bool,
    pub video_id: String,
    pub rows_updated: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningResponse {
    pub success: bool,
    pub daily_limit: DailyLimit,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/limit
pub async fn get_limit(State(state): State<AppState>) -> AppResult<Json<DailyLimit>> {
    let limit = state.session.daily_limit().await?;
    Ok(Json(limit))
}

/// GET /api/v1/videos?maxDuration=N
///
/// Returns an empty `videos` array once the day is locked.
pub async fn get_grid(
    State(state): State<AppState>,
    Query(params): Query<GridQuery>,
) -> AppResult<Json<Grid>> {
    let grid = state.session.select_child_grid(params.max_duration).await?;
    Ok(Json(grid))
}

/// POST /api/v1/watch
pub async fn record_watch(
    State(state): State<AppState>,
    Json(input): Json<RecordWatch>,
) -> AppResult<Json<WatchResponse>> {
    let daily_limit = state.session.record_watch(&input).await?;
    Ok(Json(WatchResponse {
        success: true,
        daily_limit,
    }))
}

/// POST /api/v1/videos/{video_id}/unavailable
///
/// Reported by the player when the embed refuses to play. Repeat reports
/// succeed with `rowsUpdated: 0`.
pub async fn mark_unavailable(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<Json<UnavailableResponse>> {
    let rows_updated = state.session.mark_unavailable(&video_id).await?;
    Ok(Json(UnavailableResponse {
        success: true,
        video_id,
        rows_updated,
    }))
}

/// POST /api/v1/playback/check
pub async fn check_playback(
    State(state): State<AppState>,
    Json(input): Json<PlaybackCheckRequest>,
) -> AppResult<Json<PlaybackCheck>> {
    let check = state
        .session
        .check_playback(input.video_duration_seconds)
        .await?;
    Ok(Json(check))
}

/// POST /api/v1/warnings
pub async fn report_warning(
    State(state): State<AppState>,
    Json(input): Json<WarningRequest>,
) -> AppResult<Json<WarningResponse>> {
    let daily_limit = state.session.report_warning(&input.warning_type).await?;
    Ok(Json(WarningResponse {
        success: true,
        daily_limit,
    }))
}
