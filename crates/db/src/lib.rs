//! SQLite persistence for the viewing-session engine.
//!
//! Repositories take `&mut SqliteConnection` rather than the pool so every
//! query of an operation can run inside the caller's transaction:
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! let seconds = WatchEventRepo::countable_seconds_for_day(&mut tx, today).await?;
//! tx.commit().await?;
//! ```
//!
//! A transaction dropped without `commit` rolls back.

pub mod models;
pub mod repositories;

use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub type DbPool = sqlx::SqlitePool;

/// Create a connection pool from a database URL such as `sqlite://kidscreen.db`.
///
/// The database file is created if missing, runs in WAL mode and enforces
/// foreign keys.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

static MIGRATOR: Migrator = sqlx::migrate!("../../db/migrations");

/// Apply pending schema migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Applied schema version against the newest one this build ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaStatus {
    /// Highest successfully applied migration, `None` on a blank database.
    pub applied: Option<i64>,
    pub latest: Option<i64>,
}

impl SchemaStatus {
    pub fn is_current(&self) -> bool {
        self.applied == self.latest
    }
}

/// Read the schema version recorded by the migrator.
pub async fn schema_status(pool: &DbPool) -> Result<SchemaStatus, sqlx::Error> {
    let applied = match sqlx::query_scalar::<_, Option<i64>>(
        "SELECT MAX(version) FROM _sqlx_migrations WHERE success = 1",
    )
    .fetch_one(pool)
    .await
    {
        Ok(version) => version,
        // No bookkeeping table: migrations never ran.
        Err(sqlx::Error::Database(_)) => None,
        Err(e) => return Err(e),
    };
    let latest = MIGRATOR.iter().map(|m| m.version).max();
    Ok(SchemaStatus { applied, latest })
}
