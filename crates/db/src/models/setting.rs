use kidscreen_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `settings` table. `value` is JSON-encoded.
#[derive(Debug, Clone, FromRow)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub updated_at: Timestamp,
}
