//! Curator (parent) operations.
//!
//! Authentication is enforced by the outer layer; nothing here checks who
//! the caller is.

use kidscreen_core::catalog::{validate_catalog_video, validate_source_kind};
use kidscreen_core::clock::UtcDay;
use kidscreen_core::daily_limit::{minutes_from_seconds, DailyLimit, DEFAULT_DAILY_LIMIT_MINUTES};
use kidscreen_core::error::CoreError;
use kidscreen_core::settings::{
    validate_int_setting, DEFAULT_GRID_SIZE, KEY_DAILY_LIMIT_MINUTES, KEY_GRID_SIZE,
};
use kidscreen_core::types::DbId;
use kidscreen_core::video_id::validate_video_id;
use kidscreen_db::models::banned_video::BannedVideo;
use kidscreen_db::models::content_source::{ContentSource, CreateContentSource};
use kidscreen_db::models::video::{CreateVideo, VideoCard};
use kidscreen_db::models::watch_event::WatchEvent;
use kidscreen_db::repositories::{
    BannedVideoRepo, ContentSourceRepo, SettingRepo, VideoRepo, WatchEventRepo,
};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;

use crate::error::SessionResult;
use crate::session::{append_watch, limit_in, RecordWatch, ViewingSession};

/// Days covered by [`ViewingSession::weekly_summary`].
pub const SUMMARY_DAYS: u32 = 7;

/// Behavioural settings as shown to the curator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub daily_limit_minutes: i64,
    pub grid_size: i64,
}

/// Partial settings update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettings {
    pub daily_limit_minutes: Option<i64>,
    pub grid_size: Option<i64>,
}

/// Countable minutes watched on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: UtcDay,
    pub minutes_watched: i64,
}

impl ViewingSession {
    // -----------------------------------------------------------------------
    // Reset
    // -----------------------------------------------------------------------

    /// Erase today's countable watches and return the restored limit state.
    ///
    /// Manual replays and the grace video stay in the history.
    pub async fn reset_today(&self) -> SessionResult<DailyLimit> {
        let today = self.today();
        let mut tx = self.begin_write().await?;
        let deleted = WatchEventRepo::delete_countable_for_day(&mut tx, today).await?;
        let limit = limit_in(&mut tx, today).await?;
        tx.commit().await?;

        tracing::info!(%today, deleted, "Reset today's viewing budget");
        Ok(limit)
    }

    // -----------------------------------------------------------------------
    // Replay
    // -----------------------------------------------------------------------

    /// Record a curator-initiated replay and return the card to play.
    ///
    /// Replays never count toward the budget.
    pub async fn replay(&self, video_id: &str) -> SessionResult<VideoCard> {
        validate_video_id(video_id)?;
        let now = self.clock.now();

        let mut tx = self.begin_write().await?;
        let video = VideoRepo::find_eligible(&mut tx, video_id)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: "Video",
                id: video_id.to_string(),
            })?;
        append_watch(
            &mut tx,
            &RecordWatch {
                video_id: video_id.to_string(),
                completed: false,
                duration_watched_seconds: 0,
                manual_play: true,
                grace_play: false,
            },
            now,
        )
        .await?;
        tx.commit().await?;

        tracing::info!(video_id, "Recorded curator replay");
        Ok(VideoCard::from(video))
    }

    // -----------------------------------------------------------------------
    // Content sources
    // -----------------------------------------------------------------------

    /// Register a source and ingest its first batch of videos.
    pub async fn create_source(&self, input: &CreateContentSource) -> SessionResult<ContentSource> {
        validate_source_kind(&input.source_type)?;
        if input.source_id.trim().is_empty() || input.name.trim().is_empty() {
            return Err(
                CoreError::Validation("sourceId and name must not be empty".into()).into(),
            );
        }
        validate_videos(&input.videos)?;
        let now = self.clock.now();

        let mut tx = self.begin_write().await?;
        if ContentSourceRepo::find_by_source_id(&mut tx, &input.source_id)
            .await?
            .is_some()
        {
            return Err(CoreError::Conflict(format!(
                "Source '{}' is already registered",
                input.source_id
            ))
            .into());
        }
        let source = ContentSourceRepo::create(
            &mut tx,
            &input.source_id,
            &input.source_type,
            &input.name,
            now,
        )
        .await?;
        let source = ingest(&mut tx, source.id, &input.videos, now).await?;
        tx.commit().await?;

        tracing::info!(
            source_id = %source.source_id,
            kind = %source.source_type,
            videos = source.video_count,
            "Registered content source",
        );
        Ok(source)
    }

    /// Ingest a refreshed batch of videos for an existing source.
    ///
    /// Videos the source already has are skipped.
    pub async fn refresh_source(
        &self,
        id: DbId,
        videos: &[CreateVideo],
    ) -> SessionResult<ContentSource> {
        validate_videos(videos)?;
        let now = self.clock.now();

        let mut tx = self.begin_write().await?;
        if ContentSourceRepo::find_by_id(&mut tx, id).await?.is_none() {
            return Err(source_not_found(id).into());
        }
        let source = ingest(&mut tx, id, videos, now).await?;
        tx.commit().await?;

        tracing::info!(id, videos = source.video_count, "Refreshed content source");
        Ok(source)
    }

    pub async fn list_sources(&self) -> SessionResult<Vec<ContentSource>> {
        let mut tx = self.pool.begin().await?;
        let sources = ContentSourceRepo::list(&mut tx).await?;
        tx.commit().await?;
        Ok(sources)
    }

    /// Delete a source together with its catalog rows.
    pub async fn delete_source(&self, id: DbId) -> SessionResult<()> {
        let mut tx = self.begin_write().await?;
        if !ContentSourceRepo::delete(&mut tx, id).await? {
            return Err(source_not_found(id).into());
        }
        tx.commit().await?;
        tracing::info!(id, "Deleted content source");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Ban list
    // -----------------------------------------------------------------------

    pub async fn ban_video(&self, video_id: &str) -> SessionResult<BannedVideo> {
        validate_video_id(video_id)?;
        let now = self.clock.now();
        let mut tx = self.begin_write().await?;
        let banned = BannedVideoRepo::ban(&mut tx, video_id, now).await?;
        tx.commit().await?;
        tracing::info!(video_id, "Banned video");
        Ok(banned)
    }

    pub async fn unban_video(&self, video_id: &str) -> SessionResult<()> {
        let mut tx = self.begin_write().await?;
        if !BannedVideoRepo::unban(&mut tx, video_id).await? {
            return Err(CoreError::NotFound {
                entity: "BannedVideo",
                id: video_id.to_string(),
            }
            .into());
        }
        tx.commit().await?;
        tracing::info!(video_id, "Unbanned video");
        Ok(())
    }

    pub async fn list_banned(&self) -> SessionResult<Vec<BannedVideo>> {
        let mut tx = self.pool.begin().await?;
        let banned = BannedVideoRepo::list(&mut tx).await?;
        tx.commit().await?;
        Ok(banned)
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    pub async fn settings(&self) -> SessionResult<Settings> {
        let mut tx = self.pool.begin().await?;
        let settings = read_settings(&mut tx).await?;
        tx.commit().await?;
        Ok(settings)
    }

    /// Validate and apply a partial settings update.
    pub async fn update_settings(&self, input: &UpdateSettings) -> SessionResult<Settings> {
        let updates: Vec<(&str, i64)> = [
            (KEY_DAILY_LIMIT_MINUTES, input.daily_limit_minutes),
            (KEY_GRID_SIZE, input.grid_size),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect();
        for (key, value) in &updates {
            validate_int_setting(key, *value)?;
        }
        let now = self.clock.now();

        let mut tx = self.begin_write().await?;
        for (key, value) in &updates {
            SettingRepo::set_int(&mut tx, key, *value, now).await?;
        }
        let settings = read_settings(&mut tx).await?;
        tx.commit().await?;

        tracing::info!(
            daily_limit_minutes = settings.daily_limit_minutes,
            grid_size = settings.grid_size,
            "Updated settings",
        );
        Ok(settings)
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Every watch event on `date` (`YYYY-MM-DD`), newest first.
    pub async fn history_for_day(&self, date: &str) -> SessionResult<Vec<WatchEvent>> {
        let day = UtcDay::parse(date)?;
        let mut tx = self.pool.begin().await?;
        let events = WatchEventRepo::list_for_day(&mut tx, day).await?;
        tx.commit().await?;
        Ok(events)
    }

    /// Countable minutes for each of the last seven days, oldest first.
    pub async fn weekly_summary(&self) -> SessionResult<Vec<DaySummary>> {
        let today = self.today();
        let from = today.window_start(SUMMARY_DAYS);
        let mut tx = self.pool.begin().await?;
        let totals = WatchEventRepo::countable_seconds_by_day(&mut tx, from, today).await?;
        tx.commit().await?;

        let summary = (0..SUMMARY_DAYS)
            .rev()
            .map(|back| {
                let date = today.days_before(back);
                let key = date.to_string();
                let seconds = totals
                    .iter()
                    .find(|t| t.day == key)
                    .map(|t| t.seconds)
                    .unwrap_or(0);
                DaySummary {
                    date,
                    minutes_watched: minutes_from_seconds(seconds),
                }
            })
            .collect();
        Ok(summary)
    }

    /// Delete watch events dated before `today - days`.
    pub async fn purge_history_older_than(&self, days: u32) -> SessionResult<u64> {
        if days == 0 {
            return Err(CoreError::Validation("Retention must be at least 1 day".into()).into());
        }
        let cutoff = self.today().days_before(days);
        let mut tx = self.begin_write().await?;
        let deleted = WatchEventRepo::delete_before(&mut tx, cutoff).await?;
        tx.commit().await?;
        tracing::info!(%cutoff, deleted, "Purged old watch history");
        Ok(deleted)
    }
}

fn source_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "ContentSource",
        id: id.to_string(),
    }
}

fn validate_videos(videos: &[CreateVideo]) -> Result<(), CoreError> {
    for v in videos {
        validate_catalog_video(&v.video_id, &v.title, v.duration_seconds)?;
    }
    Ok(())
}

/// Insert `videos` for a source and stamp the refresh.
async fn ingest(
    conn: &mut SqliteConnection,
    source_id: DbId,
    videos: &[CreateVideo],
    now: kidscreen_core::types::Timestamp,
) -> SessionResult<ContentSource> {
    let inserted = VideoRepo::insert_for_source(conn, source_id, videos, now).await?;
    let count = VideoRepo::count_for_source(conn, source_id).await?;
    tracing::debug!(source_id, inserted, total = count, "Ingested videos");
    ContentSourceRepo::mark_refreshed(conn, source_id, count, now)
        .await?
        .ok_or_else(|| source_not_found(source_id).into())
}

async fn read_settings(conn: &mut SqliteConnection) -> SessionResult<Settings> {
    let daily_limit_minutes = SettingRepo::get_int(conn, KEY_DAILY_LIMIT_MINUTES)
        .await?
        .unwrap_or(DEFAULT_DAILY_LIMIT_MINUTES);
    let grid_size = SettingRepo::get_int(conn, KEY_GRID_SIZE)
        .await?
        .unwrap_or(DEFAULT_GRID_SIZE);
    Ok(Settings {
        daily_limit_minutes,
        grid_size,
    })
}
