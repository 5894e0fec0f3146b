use std::sync::Arc;

use kidscreen_session::ViewingSession;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the session wraps a pool and an `Arc` clock.
#[derive(Clone)]
pub struct AppState {
    /// The viewing-session engine (owns the database pool and clock).
    pub session: ViewingSession,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
