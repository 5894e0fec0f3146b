//! Catalog videos and the card shape shown in the child grid.

use kidscreen_core::grid::GridCandidate;
use kidscreen_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: DbId,
    pub video_id: String,
    pub title: String,
    pub content_source_id: DbId,
    pub youtube_channel_id: String,
    pub youtube_channel_name: String,
    pub thumbnail_url: String,
    pub duration_seconds: i64,
    pub published_at: Timestamp,
    pub fetched_at: Timestamp,
    pub is_available: bool,
}

impl GridCandidate for Video {
    fn video_id(&self) -> &str {
        &self.video_id
    }

    fn channel_id(&self) -> &str {
        &self.youtube_channel_id
    }

    fn duration_seconds(&self) -> i64 {
        self.duration_seconds
    }
}

/// DTO for ingesting a video fetched from the platform.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideo {
    pub video_id: String,
    pub title: String,
    pub youtube_channel_id: String,
    pub youtube_channel_name: String,
    pub thumbnail_url: String,
    pub duration_seconds: i64,
    pub published_at: Timestamp,
}

/// The video object published in grid responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoCard {
    pub video_id: String,
    pub title: String,
    pub duration_seconds: i64,
    pub thumbnail_url: String,
    pub youtube_channel_id: String,
    pub youtube_channel_name: String,
    pub published_at: Timestamp,
}

impl From<Video> for VideoCard {
    fn from(v: Video) -> Self {
        Self {
            video_id: v.video_id,
            title: v.title,
            duration_seconds: v.duration_seconds,
            thumbnail_url: v.thumbnail_url,
            youtube_channel_id: v.youtube_channel_id,
            youtube_channel_name: v.youtube_channel_name,
            published_at: v.published_at,
        }
    }
}
