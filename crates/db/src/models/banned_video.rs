use kidscreen_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `banned_videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannedVideo {
    pub video_id: String,
    pub banned_at: Timestamp,
}
