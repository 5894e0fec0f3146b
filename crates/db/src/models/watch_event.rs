//! Watch history rows and the aggregates derived from them.

use kidscreen_core::engagement::WatchStats;
use kidscreen_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `watch_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchEvent {
    pub id: DbId,
    pub video_id: String,
    pub video_title: String,
    pub channel_name: String,
    pub watched_at: Timestamp,
    pub completed: bool,
    pub manual_play: bool,
    pub grace_play: bool,
    pub duration_watched_seconds: i64,
}

/// DTO for appending a watch event.
#[derive(Debug, Clone)]
pub struct CreateWatchEvent {
    pub video_id: String,
    pub video_title: String,
    pub channel_name: String,
    pub watched_at: Timestamp,
    pub completed: bool,
    pub manual_play: bool,
    pub grace_play: bool,
    pub duration_watched_seconds: i64,
}

/// Countable-watch aggregates for one external video id over a day window.
#[derive(Debug, Clone, FromRow)]
pub struct VideoWatchStats {
    pub video_id: String,
    pub total_watches: i64,
    pub completed_watches: i64,
    pub distinct_days: i64,
    pub last_watched_at: Timestamp,
}

impl From<VideoWatchStats> for WatchStats {
    fn from(s: VideoWatchStats) -> Self {
        Self {
            total_watches: s.total_watches,
            completed_watches: s.completed_watches,
            distinct_days: s.distinct_days,
            last_watched_at: s.last_watched_at,
        }
    }
}

/// Countable seconds watched on one UTC day.
#[derive(Debug, Clone, FromRow)]
pub struct DailyTotal {
    pub day: String,
    pub seconds: i64,
}
