//! Repository for the `banned_videos` table.

use kidscreen_core::types::Timestamp;
use sqlx::SqliteConnection;

use crate::models::banned_video::BannedVideo;

pub struct BannedVideoRepo;

impl BannedVideoRepo {
    /// Ban an external id. Banning twice keeps the original `banned_at`.
    pub async fn ban(
        conn: &mut SqliteConnection,
        video_id: &str,
        banned_at: Timestamp,
    ) -> Result<BannedVideo, sqlx::Error> {
        sqlx::query(
            "INSERT INTO banned_videos (video_id, banned_at) VALUES (?1, ?2)
             ON CONFLICT (video_id) DO NOTHING",
        )
        .bind(video_id)
        .bind(banned_at)
        .execute(&mut *conn)
        .await?;

        sqlx::query_as::<_, BannedVideo>(
            "SELECT video_id, banned_at FROM banned_videos WHERE video_id = ?1",
        )
        .bind(video_id)
        .fetch_one(&mut *conn)
        .await
    }

    /// Lift a ban. Returns `false` if the id was not banned.
    pub async fn unban(conn: &mut SqliteConnection, video_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM banned_videos WHERE video_id = ?1")
            .bind(video_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All bans, most recent first.
    pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<BannedVideo>, sqlx::Error> {
        sqlx::query_as::<_, BannedVideo>(
            "SELECT video_id, banned_at FROM banned_videos ORDER BY banned_at DESC, video_id ASC",
        )
        .fetch_all(&mut *conn)
        .await
    }

    pub async fn is_banned(conn: &mut SqliteConnection, video_id: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM banned_videos WHERE video_id = ?1")
            .bind(video_id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(count > 0)
    }
}
