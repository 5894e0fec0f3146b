//! Repository for the `content_sources` table.

use kidscreen_core::types::{DbId, Timestamp};
use sqlx::SqliteConnection;

use crate::models::content_source::ContentSource;

const COLUMNS: &str = "id, source_id, source_type, name, video_count, last_refresh, added_at";

pub struct ContentSourceRepo;

impl ContentSourceRepo {
    /// Insert a new source with no videos yet.
    pub async fn create(
        conn: &mut SqliteConnection,
        source_id: &str,
        source_type: &str,
        name: &str,
        added_at: Timestamp,
    ) -> Result<ContentSource, sqlx::Error> {
        let query = format!(
            "INSERT INTO content_sources (source_id, source_type, name, added_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentSource>(&query)
            .bind(source_id)
            .bind(source_type)
            .bind(name)
            .bind(added_at)
            .fetch_one(&mut *conn)
            .await
    }

    pub async fn find_by_id(
        conn: &mut SqliteConnection,
        id: DbId,
    ) -> Result<Option<ContentSource>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content_sources WHERE id = ?1");
        sqlx::query_as::<_, ContentSource>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    pub async fn find_by_source_id(
        conn: &mut SqliteConnection,
        source_id: &str,
    ) -> Result<Option<ContentSource>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content_sources WHERE source_id = ?1");
        sqlx::query_as::<_, ContentSource>(&query)
            .bind(source_id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// All sources, oldest first.
    pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<ContentSource>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content_sources ORDER BY added_at ASC, id ASC");
        sqlx::query_as::<_, ContentSource>(&query)
            .fetch_all(&mut *conn)
            .await
    }

    /// Record a refresh: new video count and refresh instant.
    pub async fn mark_refreshed(
        conn: &mut SqliteConnection,
        id: DbId,
        video_count: i64,
        refreshed_at: Timestamp,
    ) -> Result<Option<ContentSource>, sqlx::Error> {
        let query = format!(
            "UPDATE content_sources SET video_count = ?2, last_refresh = ?3
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentSource>(&query)
            .bind(id)
            .bind(video_count)
            .bind(refreshed_at)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Delete a source and, through the foreign key, its videos.
    pub async fn delete(conn: &mut SqliteConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM content_sources WHERE id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
