//! Handlers for the `/admin` (curator) resource.
//!
//! Covers the budget reset, behavioural settings, content sources, the ban
//! list, watch history, replays and history retention. Every route assumes
//! the caller was authenticated upstream.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kidscreen_core::types::DbId;
use kidscreen_db::models::banned_video::BannedVideo;
use kidscreen_db::models::content_source::{ContentSource, CreateContentSource};
use kidscreen_db::models::video::{CreateVideo, VideoCard};
use kidscreen_db::models::watch_event::WatchEvent;
use kidscreen_session::curator::{DaySummary, Settings, UpdateSettings};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, ResetResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Request body for ingesting a refreshed batch of source videos.
#[derive(Debug, Deserialize)]
pub struct RefreshSourceRequest {
    #[serde(default)]
    pub videos: Vec<CreateVideo>,
}

/// Request body naming a single external video id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoIdRequest {
    pub video_id: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// UTC day, `YYYY-MM-DD`.
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeQuery {
    /// Overrides the configured retention window.
    pub older_than_days: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeResult {
    pub deleted: u64,
    pub older_than_days: u32,
}

// ---------------------------------------------------------------------------
// Reset
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/reset
pub async fn reset_today(State(state): State<AppState>) -> AppResult<Json<ResetResponse>> {
    let new_limit = state.session.reset_today().await?;
    Ok(Json(ResetResponse {
        success: true,
        message: "Today's viewing time has been reset".to_string(),
        new_limit,
    }))
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/settings
pub async fn get_settings(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Settings>>> {
    let settings = state.session.settings().await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/admin/settings
///
/// Partial update; omitted fields keep their stored value.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(input): Json<UpdateSettings>,
) -> AppResult<Json<DataResponse<Settings>>> {
    let settings = state.session.update_settings(&input).await?;
    Ok(Json(DataResponse { data: settings }))
}

// ---------------------------------------------------------------------------
// Content sources
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/sources
pub async fn list_sources(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ContentSource>>>> {
    let sources = state.session.list_sources().await?;
    Ok(Json(DataResponse { data: sources }))
}

/// POST /api/v1/admin/sources
pub async fn create_source(
    State(state): State<AppState>,
    Json(input): Json<CreateContentSource>,
) -> AppResult<(StatusCode, Json<DataResponse<ContentSource>>)> {
    let source = state.session.create_source(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: source })))
}

/// DELETE /api/v1/admin/sources/{id}
///
/// Deletes the source's catalog rows with it.
pub async fn delete_source(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.session.delete_source(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/sources/{id}/refresh
pub async fn refresh_source(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RefreshSourceRequest>,
) -> AppResult<Json<DataResponse<ContentSource>>> {
    let source = state.session.refresh_source(id, &input.videos).await?;
    Ok(Json(DataResponse { data: source }))
}

// ---------------------------------------------------------------------------
// Ban list
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/bans
pub async fn list_bans(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<BannedVideo>>>> {
    let bans = state.session.list_banned().await?;
    Ok(Json(DataResponse { data: bans }))
}

/// POST /api/v1/admin/bans
///
/// Banning an already-banned id returns the existing entry.
pub async fn ban_video(
    State(state): State<AppState>,
    Json(input): Json<VideoIdRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BannedVideo>>)> {
    let banned = state.session.ban_video(&input.video_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: banned })))
}

/// DELETE /api/v1/admin/bans/{video_id}
pub async fn unban_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<StatusCode> {
    state.session.unban_video(&video_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/history?date=YYYY-MM-DD
pub async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> AppResult<Json<DataResponse<Vec<WatchEvent>>>> {
    let date = params
        .date
        .ok_or_else(|| AppError::BadRequest("Query parameter 'date' is required".into()))?;
    let events = state.session.history_for_day(&date).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/admin/stats/weekly
pub async fn get_weekly_summary(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<DaySummary>>>> {
    let summary = state.session.weekly_summary().await?;
    Ok(Json(DataResponse { data: summary }))
}

// ---------------------------------------------------------------------------
// Replay and maintenance
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/replay
///
/// Records a manual play (never counted against the budget) and returns
/// the card for the embedded player.
pub async fn replay(
    State(state): State<AppState>,
    Json(input): Json<VideoIdRequest>,
) -> AppResult<Json<DataResponse<VideoCard>>> {
    let card = state.session.replay(&input.video_id).await?;
    Ok(Json(DataResponse { data: card }))
}

/// POST /api/v1/admin/maintenance/purge?olderThanDays=N
///
/// Defaults to the configured retention window.
pub async fn purge_history(
    State(state): State<AppState>,
    Query(params): Query<PurgeQuery>,
) -> AppResult<Json<DataResponse<PurgeResult>>> {
    let older_than_days = params
        .older_than_days
        .unwrap_or(state.config.watch_history_retention_days);
    let deleted = state
        .session
        .purge_history_older_than(older_than_days)
        .await?;
    Ok(Json(DataResponse {
        data: PurgeResult {
            deleted,
            older_than_days,
        },
    }))
}
