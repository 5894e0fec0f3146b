//! Repository for the `watch_history` table.
//!
//! Day predicates compare `date(watched_at)` (SQLite normalizes the stored
//! RFC 3339 text to its UTC date) with a bound `YYYY-MM-DD` string. Rows
//! with `manual_play` or `grace_play` set are excluded from every countable
//! aggregate.

use kidscreen_core::clock::UtcDay;
use sqlx::SqliteConnection;

use crate::models::watch_event::{CreateWatchEvent, DailyTotal, VideoWatchStats, WatchEvent};

const COLUMNS: &str = "id, video_id, video_title, channel_name, watched_at, completed, \
    manual_play, grace_play, duration_watched_seconds";

pub struct WatchEventRepo;

impl WatchEventRepo {
    /// Append a watch event.
    pub async fn create(
        conn: &mut SqliteConnection,
        input: &CreateWatchEvent,
    ) -> Result<WatchEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO watch_history
                (video_id, video_title, channel_name, watched_at, completed, manual_play,
                 grace_play, duration_watched_seconds)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WatchEvent>(&query)
            .bind(&input.video_id)
            .bind(&input.video_title)
            .bind(&input.channel_name)
            .bind(input.watched_at)
            .bind(input.completed)
            .bind(input.manual_play)
            .bind(input.grace_play)
            .bind(input.duration_watched_seconds)
            .fetch_one(&mut *conn)
            .await
    }

    /// Sum of countable seconds watched on `day`.
    pub async fn countable_seconds_for_day(
        conn: &mut SqliteConnection,
        day: UtcDay,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(duration_watched_seconds), 0) FROM watch_history
             WHERE date(watched_at) = ?1 AND manual_play = 0 AND grace_play = 0",
        )
        .bind(day.as_naive())
        .fetch_one(&mut *conn)
        .await
    }

    /// Whether a grace video was watched on `day`.
    pub async fn grace_consumed_on(
        conn: &mut SqliteConnection,
        day: UtcDay,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM watch_history WHERE date(watched_at) = ?1 AND grace_play = 1",
        )
        .bind(day.as_naive())
        .fetch_one(&mut *conn)
        .await?;
        Ok(count > 0)
    }

    /// Countable aggregates per external video id over the `days_back` days
    /// ending on `day` (inclusive).
    pub async fn history_slice(
        conn: &mut SqliteConnection,
        day: UtcDay,
        days_back: u32,
    ) -> Result<Vec<VideoWatchStats>, sqlx::Error> {
        sqlx::query_as::<_, VideoWatchStats>(
            "SELECT video_id,
                    COUNT(*) AS total_watches,
                    COALESCE(SUM(completed), 0) AS completed_watches,
                    COUNT(DISTINCT date(watched_at)) AS distinct_days,
                    MAX(watched_at) AS last_watched_at
             FROM watch_history
             WHERE date(watched_at) BETWEEN ?1 AND ?2
               AND manual_play = 0 AND grace_play = 0
             GROUP BY video_id
             ORDER BY video_id ASC",
        )
        .bind(day.window_start(days_back).as_naive())
        .bind(day.as_naive())
        .fetch_all(&mut *conn)
        .await
    }

    /// Delete the countable events of `day`. Manual and grace plays stay.
    pub async fn delete_countable_for_day(
        conn: &mut SqliteConnection,
        day: UtcDay,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM watch_history
             WHERE date(watched_at) = ?1 AND manual_play = 0 AND grace_play = 0",
        )
        .bind(day.as_naive())
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Every event on `day`, newest first.
    pub async fn list_for_day(
        conn: &mut SqliteConnection,
        day: UtcDay,
    ) -> Result<Vec<WatchEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM watch_history
             WHERE date(watched_at) = ?1
             ORDER BY watched_at DESC, id DESC"
        );
        sqlx::query_as::<_, WatchEvent>(&query)
            .bind(day.as_naive())
            .fetch_all(&mut *conn)
            .await
    }

    /// Countable seconds per day in `[from, to]`. Days without events are
    /// omitted.
    pub async fn countable_seconds_by_day(
        conn: &mut SqliteConnection,
        from: UtcDay,
        to: UtcDay,
    ) -> Result<Vec<DailyTotal>, sqlx::Error> {
        sqlx::query_as::<_, DailyTotal>(
            "SELECT date(watched_at) AS day, SUM(duration_watched_seconds) AS seconds
             FROM watch_history
             WHERE date(watched_at) BETWEEN ?1 AND ?2
               AND manual_play = 0 AND grace_play = 0
             GROUP BY date(watched_at)
             ORDER BY day ASC",
        )
        .bind(from.as_naive())
        .bind(to.as_naive())
        .fetch_all(&mut *conn)
        .await
    }

    /// Delete every event dated strictly before `cutoff`.
    pub async fn delete_before(
        conn: &mut SqliteConnection,
        cutoff: UtcDay,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM watch_history WHERE date(watched_at) < ?1")
            .bind(cutoff.as_naive())
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }
}
