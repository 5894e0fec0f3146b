//! Shared response envelope types for API handlers.
//!
//! Curator responses use a `{ "data": ... }` envelope. The child-facing
//! endpoints publish their own fixed shapes (grid, watch, reset) because the
//! player depends on them.

use kidscreen_core::daily_limit::DailyLimit;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: sources }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Response to `POST /watch`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchResponse {
    pub success: bool,
    pub daily_limit: DailyLimit,
}

/// Response to `POST /admin/reset`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
    pub new_limit: DailyLimit,
}
