use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Payload of `GET /health`.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable or its schema
    /// is behind this build.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Highest applied migration version.
    pub schema_version: Option<i64>,
    pub migrations_pending: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let pool = state.session.pool();
    let db_healthy = kidscreen_db::health_check(pool).await.is_ok();
    let schema = match kidscreen_db::schema_status(pool).await {
        Ok(schema) => Some(schema),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read schema version");
            None
        }
    };

    let migrations_pending = schema.map_or(true, |s| !s.is_current());
    let status = if db_healthy && !migrations_pending {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        schema_version: schema.and_then(|s| s.applied),
        migrations_pending,
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
