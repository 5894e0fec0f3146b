//! Repository for the `videos` table (the catalog).

use kidscreen_core::types::{DbId, Timestamp};
use sqlx::SqliteConnection;

use crate::models::video::{CreateVideo, Video};

const COLUMNS: &str = "id, video_id, title, content_source_id, youtube_channel_id, \
    youtube_channel_name, thumbnail_url, duration_seconds, published_at, fetched_at, is_available";

pub struct VideoRepo;

impl VideoRepo {
    /// Every selectable catalog row, ordered by row id.
    ///
    /// A row qualifies when it is available, no other row with the same
    /// external id has been marked unavailable, and (with `exclude_banned`)
    /// the external id is not banned. `max_duration_seconds` additionally
    /// caps the duration.
    pub async fn available(
        conn: &mut SqliteConnection,
        exclude_banned: bool,
        max_duration_seconds: Option<i64>,
    ) -> Result<Vec<Video>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM videos
             WHERE is_available = 1
               AND video_id NOT IN (SELECT video_id FROM videos WHERE is_available = 0)
               AND (?1 = 0 OR video_id NOT IN (SELECT video_id FROM banned_videos))
               AND (?2 IS NULL OR duration_seconds <= ?2)
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(exclude_banned)
            .bind(max_duration_seconds)
            .fetch_all(&mut *conn)
            .await
    }

    /// First eligible (available, not banned) row for an external id.
    pub async fn find_eligible(
        conn: &mut SqliteConnection,
        video_id: &str,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM videos
             WHERE video_id = ?1
               AND is_available = 1
               AND NOT EXISTS (SELECT 1 FROM videos WHERE video_id = ?1 AND is_available = 0)
               AND NOT EXISTS (SELECT 1 FROM banned_videos WHERE video_id = ?1)
             ORDER BY id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(video_id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// First row for an external id regardless of availability or bans.
    pub async fn find_first(
        conn: &mut SqliteConnection,
        video_id: &str,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM videos WHERE video_id = ?1 ORDER BY id ASC LIMIT 1"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(video_id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Number of rows sharing an external id.
    pub async fn count_by_video_id(
        conn: &mut SqliteConnection,
        video_id: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE video_id = ?1")
            .bind(video_id)
            .fetch_one(&mut *conn)
            .await
    }

    /// Flip every available row with this external id to unavailable.
    /// Returns the number of rows changed; zero on a repeat call.
    pub async fn mark_unavailable(
        conn: &mut SqliteConnection,
        video_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE videos SET is_available = 0 WHERE video_id = ?1 AND is_available = 1")
                .bind(video_id)
                .execute(&mut *conn)
                .await?;
        Ok(result.rows_affected())
    }

    /// Insert videos for a source, skipping ones the source already has.
    /// Returns the number of rows inserted.
    pub async fn insert_for_source(
        conn: &mut SqliteConnection,
        content_source_id: DbId,
        videos: &[CreateVideo],
        fetched_at: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let mut inserted = 0;
        for v in videos {
            let result = sqlx::query(
                "INSERT INTO videos
                    (video_id, title, content_source_id, youtube_channel_id, youtube_channel_name,
                     thumbnail_url, duration_seconds, published_at, fetched_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT (video_id, content_source_id) DO NOTHING",
            )
            .bind(&v.video_id)
            .bind(&v.title)
            .bind(content_source_id)
            .bind(&v.youtube_channel_id)
            .bind(&v.youtube_channel_name)
            .bind(&v.thumbnail_url)
            .bind(v.duration_seconds)
            .bind(v.published_at)
            .bind(fetched_at)
            .execute(&mut *conn)
            .await?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }

    /// Number of catalog rows owned by a source.
    pub async fn count_for_source(
        conn: &mut SqliteConnection,
        content_source_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE content_source_id = ?1")
            .bind(content_source_id)
            .fetch_one(&mut *conn)
            .await
    }
}
