//! Content sources: channels and playlists registered by the curator.

use kidscreen_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::video::CreateVideo;

/// A row from the `content_sources` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSource {
    pub id: DbId,
    pub source_id: String,
    pub source_type: String,
    pub name: String,
    pub video_count: i64,
    pub last_refresh: Option<Timestamp>,
    pub added_at: Timestamp,
}

/// DTO for registering a source together with its first batch of videos.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentSource {
    pub source_id: String,
    pub source_type: String,
    pub name: String,
    #[serde(default)]
    pub videos: Vec<CreateVideo>,
}
