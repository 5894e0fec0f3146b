//! Child-facing operations: limit state, grid selection, watch recording,
//! unavailability reports and playback checks.

use std::collections::HashMap;
use std::sync::Arc;

use kidscreen_core::clock::{Clock, UtcDay};
use kidscreen_core::daily_limit::{self, DailyLimit, LimitState, DEFAULT_DAILY_LIMIT_MINUTES};
use kidscreen_core::engagement::{self, WatchStats, HISTORY_WINDOW_DAYS};
use kidscreen_core::error::CoreError;
use kidscreen_core::grid::{
    dedupe_by_video_id, grace_size, sample_weighted, shortest_first, GRACE_MAX_DURATION_SECONDS,
};
use kidscreen_core::interruption::{duration_minutes, should_interrupt};
use kidscreen_core::settings::{DEFAULT_GRID_SIZE, KEY_DAILY_LIMIT_MINUTES, KEY_GRID_SIZE};
use kidscreen_core::types::Timestamp;
use kidscreen_core::video_id::validate_video_id;
use kidscreen_core::warnings::parse_warning_type;
use kidscreen_db::models::video::{Video, VideoCard};
use kidscreen_db::models::watch_event::CreateWatchEvent;
use kidscreen_db::repositories::{SettingRepo, VideoRepo, WatchEventRepo};
use kidscreen_db::DbPool;
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, SqliteConnection, Transaction};

use crate::error::SessionResult;

/// Title snapshot stored when a watched id has no catalog row.
const UNKNOWN_TITLE: &str = "Unknown video";

/// Channel snapshot stored when a watched id has no catalog row.
const UNKNOWN_CHANNEL: &str = "Unknown channel";

/// A watch event reported by the player (or by the curator's replay).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordWatch {
    pub video_id: String,
    pub completed: bool,
    pub duration_watched_seconds: i64,
    #[serde(default)]
    pub manual_play: bool,
    #[serde(default)]
    pub grace_play: bool,
}

/// A grid of videos and the limit state it was selected under.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub videos: Vec<VideoCard>,
    pub daily_limit: DailyLimit,
}

/// Result of checking whether the playing video must be cut off.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackCheck {
    pub interrupt: bool,
    pub daily_limit: DailyLimit,
}

/// The viewing-session engine. Cheap to clone.
#[derive(Clone)]
pub struct ViewingSession {
    pub(crate) pool: DbPool,
    pub(crate) clock: Arc<dyn Clock>,
}

impl ViewingSession {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Open a transaction for an operation that writes.
    ///
    /// `BEGIN IMMEDIATE` takes the database write lock up front, so a
    /// concurrent writer waits out the busy timeout instead of failing
    /// with `SQLITE_BUSY` when its read lock cannot be upgraded.
    pub(crate) async fn begin_write(&self) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.pool.begin_with("BEGIN IMMEDIATE").await
    }

    pub(crate) fn today(&self) -> UtcDay {
        UtcDay::today(self.clock.as_ref())
    }

    // -----------------------------------------------------------------------
    // Limit state
    // -----------------------------------------------------------------------

    /// Current daily-limit state.
    pub async fn daily_limit(&self) -> SessionResult<DailyLimit> {
        let today = self.today();
        let mut tx = self.pool.begin().await?;
        let limit = limit_in(&mut tx, today).await?;
        tx.commit().await?;
        Ok(limit)
    }

    // -----------------------------------------------------------------------
    // Grid selection
    // -----------------------------------------------------------------------

    /// Select a grid of `count` videos, optionally capped at
    /// `max_duration_seconds`.
    ///
    /// Returns an empty grid when the day is locked. Fails with
    /// [`CoreError::NoVideosAvailable`] when nothing is eligible even after
    /// the grace and wind-down fallbacks.
    pub async fn select_grid(
        &self,
        count: usize,
        max_duration_seconds: Option<i64>,
    ) -> SessionResult<Grid> {
        validate_grid_request(count, max_duration_seconds)?;
        let now = self.clock.now();
        let today = UtcDay::of(&now);

        let mut tx = self.pool.begin().await?;
        let limit = limit_in(&mut tx, today).await?;
        let videos = compose_grid(&mut tx, &limit, now, count, max_duration_seconds).await?;
        tx.commit().await?;

        tracing::debug!(
            state = limit.current_state.as_str(),
            requested = count,
            returned = videos.len(),
            "Selected grid",
        );
        Ok(Grid {
            videos,
            daily_limit: limit,
        })
    }

    /// Select the grid shown on the child's home screen.
    ///
    /// Uses the `grid_size` setting and, during wind-down with no explicit
    /// cap, restricts the catalog to videos that fit the remaining minutes.
    pub async fn select_child_grid(&self, max_duration_seconds: Option<i64>) -> SessionResult<Grid> {
        if let Some(max) = max_duration_seconds {
            validate_grid_request(1, Some(max))?;
        }
        let now = self.clock.now();
        let today = UtcDay::of(&now);

        let mut tx = self.pool.begin().await?;
        let limit = limit_in(&mut tx, today).await?;
        let count = SettingRepo::get_int(&mut tx, KEY_GRID_SIZE)
            .await?
            .unwrap_or(DEFAULT_GRID_SIZE);
        let max_duration = max_duration_seconds.or_else(|| {
            (limit.current_state == LimitState::Winddown).then(|| limit.minutes_remaining * 60)
        });
        let videos = compose_grid(&mut tx, &limit, now, count as usize, max_duration).await?;
        tx.commit().await?;

        tracing::debug!(
            state = limit.current_state.as_str(),
            grid_size = count,
            max_duration = ?max_duration,
            returned = videos.len(),
            "Selected child grid",
        );
        Ok(Grid {
            videos,
            daily_limit: limit,
        })
    }

    // -----------------------------------------------------------------------
    // Watch recording
    // -----------------------------------------------------------------------

    /// Append a watch event and return the refreshed limit state.
    ///
    /// The id is not required to be in the catalog; selection-time filtering
    /// is what keeps unavailable or banned videos away from the child.
    pub async fn record_watch(&self, input: &RecordWatch) -> SessionResult<DailyLimit> {
        validate_video_id(&input.video_id)?;
        if input.duration_watched_seconds < 0 {
            return Err(CoreError::Validation(format!(
                "durationWatchedSeconds must be >= 0, got {}",
                input.duration_watched_seconds
            ))
            .into());
        }

        let now = self.clock.now();
        let today = UtcDay::of(&now);

        let mut tx = self.begin_write().await?;
        append_watch(&mut tx, input, now).await?;
        let limit = limit_in(&mut tx, today).await?;
        tx.commit().await?;

        tracing::info!(
            video_id = %input.video_id,
            completed = input.completed,
            duration_watched_seconds = input.duration_watched_seconds,
            manual_play = input.manual_play,
            grace_play = input.grace_play,
            state = limit.current_state.as_str(),
            minutes_watched = limit.minutes_watched,
            "Recorded watch",
        );
        Ok(limit)
    }

    // -----------------------------------------------------------------------
    // Availability
    // -----------------------------------------------------------------------

    /// Mark every catalog row with this external id unavailable.
    ///
    /// Idempotent: a second call changes nothing and succeeds. Fails with
    /// `NotFound` when no catalog row has the id.
    pub async fn mark_unavailable(&self, video_id: &str) -> SessionResult<u64> {
        validate_video_id(video_id)?;

        let mut tx = self.begin_write().await?;
        let changed = VideoRepo::mark_unavailable(&mut tx, video_id).await?;
        if changed == 0 && VideoRepo::count_by_video_id(&mut tx, video_id).await? == 0 {
            return Err(CoreError::NotFound {
                entity: "Video",
                id: video_id.to_string(),
            }
            .into());
        }
        tx.commit().await?;

        tracing::info!(video_id, rows = changed, "Marked video unavailable");
        Ok(changed)
    }

    // -----------------------------------------------------------------------
    // Player bridge
    // -----------------------------------------------------------------------

    /// Whether a video of `video_duration_seconds` must be interrupted given
    /// the current remaining budget.
    pub async fn check_playback(&self, video_duration_seconds: i64) -> SessionResult<PlaybackCheck> {
        let minutes = duration_minutes(video_duration_seconds);
        let daily_limit = self.daily_limit().await?;
        let interrupt = should_interrupt(daily_limit.minutes_remaining, minutes)?;
        Ok(PlaybackCheck {
            interrupt,
            daily_limit,
        })
    }

    /// Log a countdown warning shown by the player.
    pub async fn report_warning(&self, warning_type: &str) -> SessionResult<DailyLimit> {
        let warning = parse_warning_type(warning_type)?;
        let limit = self.daily_limit().await?;
        tracing::info!(
            warning = warning.as_str(),
            minutes_remaining = limit.minutes_remaining,
            state = limit.current_state.as_str(),
            "Player showed countdown warning",
        );
        Ok(limit)
    }
}

// ---------------------------------------------------------------------------
// Transaction-scoped helpers
// ---------------------------------------------------------------------------

/// Limit state for `today`, read through `conn`.
pub(crate) async fn limit_in(
    conn: &mut SqliteConnection,
    today: UtcDay,
) -> Result<DailyLimit, sqlx::Error> {
    let budget = SettingRepo::get_int(conn, KEY_DAILY_LIMIT_MINUTES)
        .await?
        .unwrap_or(DEFAULT_DAILY_LIMIT_MINUTES);
    let seconds = WatchEventRepo::countable_seconds_for_day(conn, today).await?;
    let grace_consumed = WatchEventRepo::grace_consumed_on(conn, today).await?;
    Ok(daily_limit::evaluate(today, seconds, budget, grace_consumed))
}

/// Append one watch event stamped `now`, snapshotting title and channel
/// from the catalog when the id is known.
pub(crate) async fn append_watch(
    conn: &mut SqliteConnection,
    input: &RecordWatch,
    now: Timestamp,
) -> Result<(), sqlx::Error> {
    let snapshot = VideoRepo::find_first(conn, &input.video_id).await?;
    let (video_title, channel_name) = match snapshot {
        Some(v) => (v.title, v.youtube_channel_name),
        None => (UNKNOWN_TITLE.to_string(), UNKNOWN_CHANNEL.to_string()),
    };

    WatchEventRepo::create(
        conn,
        &CreateWatchEvent {
            video_id: input.video_id.clone(),
            video_title,
            channel_name,
            watched_at: now,
            completed: input.completed,
            manual_play: input.manual_play,
            grace_play: input.grace_play,
            duration_watched_seconds: input.duration_watched_seconds,
        },
    )
    .await?;
    Ok(())
}

fn validate_grid_request(count: usize, max_duration_seconds: Option<i64>) -> Result<(), CoreError> {
    if count == 0 {
        return Err(CoreError::Validation("Grid size must be at least 1".into()));
    }
    if let Some(max) = max_duration_seconds {
        if max <= 0 {
            return Err(CoreError::Validation(format!(
                "maxDuration must be positive, got {max}"
            )));
        }
    }
    Ok(())
}

/// Build the grid for an already-computed limit state.
async fn compose_grid(
    conn: &mut SqliteConnection,
    limit: &DailyLimit,
    now: Timestamp,
    count: usize,
    max_duration_seconds: Option<i64>,
) -> SessionResult<Vec<VideoCard>> {
    match limit.current_state {
        LimitState::Locked => Ok(Vec::new()),
        LimitState::Grace => {
            let mut pool =
                dedupe_by_video_id(VideoRepo::available(conn, true, Some(GRACE_MAX_DURATION_SECONDS)).await?);
            if pool.is_empty() {
                tracing::warn!("No short videos for grace, falling back to shortest available");
                pool = dedupe_by_video_id(VideoRepo::available(conn, true, None).await?);
            }
            if pool.is_empty() {
                return Err(CoreError::NoVideosAvailable.into());
            }
            Ok(into_cards(shortest_first(pool, grace_size(count))))
        }
        LimitState::Normal | LimitState::Winddown => {
            let mut pool =
                dedupe_by_video_id(VideoRepo::available(conn, true, max_duration_seconds).await?);
            if pool.is_empty() && max_duration_seconds.is_some() {
                tracing::info!(
                    max_duration = ?max_duration_seconds,
                    "No videos fit the duration cap, falling back to full catalog",
                );
                pool = dedupe_by_video_id(VideoRepo::available(conn, true, None).await?);
            }
            if pool.is_empty() {
                return Err(CoreError::NoVideosAvailable.into());
            }

            let history: HashMap<String, WatchStats> =
                WatchEventRepo::history_slice(conn, limit.date, HISTORY_WINDOW_DAYS)
                    .await?
                    .into_iter()
                    .map(|s| (s.video_id.clone(), WatchStats::from(s)))
                    .collect();
            Ok(into_cards(draw(pool, &history, now, count)))
        }
    }
}

/// Score the pool and draw the grid. Kept synchronous so the thread-local
/// RNG never lives across an await point.
fn draw(
    pool: Vec<Video>,
    history: &HashMap<String, WatchStats>,
    now: Timestamp,
    count: usize,
) -> Vec<Video> {
    let scores = engagement::score_all(pool.iter().map(|v| v.video_id.as_str()), history, now);
    let weights: Vec<f64> = pool
        .iter()
        .map(|v| scores.get(&v.video_id).copied().unwrap_or(engagement::BASELINE_WEIGHT))
        .collect();
    sample_weighted(pool, &weights, count, &mut rand::rng())
}

fn into_cards(videos: Vec<Video>) -> Vec<VideoCard> {
    videos.into_iter().map(VideoCard::from).collect()
}
