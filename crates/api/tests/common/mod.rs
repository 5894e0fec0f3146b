#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use kidscreen_core::clock::ManualClock;
use kidscreen_core::types::Timestamp;
use kidscreen_session::ViewingSession;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use kidscreen_api::config::ServerConfig;
use kidscreen_api::router::build_app_router;
use kidscreen_api::state::AppState;

/// The instant every test starts at: 2025-01-15T14:30:00Z.
pub fn now() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap()
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        watch_history_retention_days: 90,
        log_json: false,
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// with the clock pinned at [`now`].
pub fn build_test_app(pool: SqlitePool) -> (Router, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(now()));
    let state = AppState {
        session: ViewingSession::new(pool, clock.clone()),
        config: Arc::new(test_config()),
    };
    (build_app_router(state), clock)
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// JSON for one catalog video.
pub fn video_json(id: &str, channel: &str, duration_seconds: i64) -> Value {
    json!({
        "videoId": id,
        "title": format!("Video {id}"),
        "youtubeChannelId": channel,
        "youtubeChannelName": format!("Channel {channel}"),
        "thumbnailUrl": format!("https://i.ytimg.com/vi/{id}/mqdefault.jpg"),
        "durationSeconds": duration_seconds,
        "publishedAt": "2024-06-01T12:00:00Z",
    })
}

/// Register a channel source with `videos` through the admin API.
pub async fn add_source(app: &Router, source_id: &str, videos: Vec<Value>) -> Value {
    let response = post_json(
        app.clone(),
        "/api/v1/admin/sources",
        json!({
            "sourceId": source_id,
            "sourceType": "channel",
            "name": format!("Source {source_id}"),
            "videos": videos,
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await
}

/// `channels` sources with `per_channel` videos each, all `duration` long.
pub async fn seed_catalog(app: &Router, channels: usize, per_channel: usize, duration: i64) {
    for c in 0..channels {
        let videos = (0..per_channel)
            .map(|v| video_json(&format!("vid{:08}", c * per_channel + v), &format!("UC{c}"), duration))
            .collect();
        add_source(app, &format!("source-{c}"), videos).await;
    }
}

/// Record a countable watch through the player API.
pub async fn watch(app: &Router, video_id: &str, seconds: i64) -> Value {
    let response = post_json(
        app.clone(),
        "/api/v1/watch",
        json!({
            "videoId": video_id,
            "completed": true,
            "durationWatchedSeconds": seconds,
        }),
    )
    .await;
    assert_eq!(response.status(), 200);
    body_json(response).await
}
