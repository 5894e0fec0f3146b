//! Periodic purge of old watch history.
//!
//! Deletes watch events older than the configured retention window once at
//! startup and then every [`CLEANUP_INTERVAL`].

use std::time::Duration;

use kidscreen_session::ViewingSession;
use tokio_util::sync::CancellationToken;

/// How often the purge runs.
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(6 * 3600);

/// Run the retention loop until `cancel` is triggered.
pub async fn run(session: ViewingSession, retention_days: u32, cancel: CancellationToken) {
    tracing::info!(
        retention_days,
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "History retention job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("History retention job stopping");
                break;
            }
            _ = interval.tick() => {
                match session.purge_history_older_than(retention_days).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "History retention: purged old events");
                    }
                    Ok(_) => tracing::debug!("History retention: nothing to purge"),
                    Err(e) => {
                        tracing::error!(error = %e, "History retention: purge failed");
                    }
                }
            }
        }
    }
}
