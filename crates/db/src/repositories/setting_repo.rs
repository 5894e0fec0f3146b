//! Repository for the `settings` key-value table.

use kidscreen_core::settings::{decode_positive_int, default_for};
use kidscreen_core::types::Timestamp;
use sqlx::SqliteConnection;

use crate::models::setting::Setting;

pub struct SettingRepo;

impl SettingRepo {
    pub async fn get(conn: &mut SqliteConnection, key: &str) -> Result<Option<Setting>, sqlx::Error> {
        sqlx::query_as::<_, Setting>("SELECT key, value, updated_at FROM settings WHERE key = ?1")
            .bind(key)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Read a positive integer setting, falling back to its default when the
    /// row is missing or holds something unreadable.
    pub async fn get_int(conn: &mut SqliteConnection, key: &str) -> Result<Option<i64>, sqlx::Error> {
        let stored = Self::get(conn, key).await?;
        let value = stored.as_ref().and_then(|s| decode_positive_int(&s.value));
        if value.is_none() && stored.is_some() {
            tracing::warn!(key, "Ignoring unreadable setting value, using default");
        }
        Ok(value.or_else(|| default_for(key)))
    }

    /// Upsert a JSON-encoded integer setting.
    pub async fn set_int(
        conn: &mut SqliteConnection,
        key: &str,
        value: i64,
        updated_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(serde_json::Value::from(value).to_string())
        .bind(updated_at)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}
