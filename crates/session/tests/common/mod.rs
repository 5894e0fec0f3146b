#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use kidscreen_core::clock::ManualClock;
use kidscreen_core::types::Timestamp;
use kidscreen_db::models::content_source::{ContentSource, CreateContentSource};
use kidscreen_db::models::video::CreateVideo;
use kidscreen_db::models::watch_event::CreateWatchEvent;
use kidscreen_db::repositories::WatchEventRepo;
use kidscreen_session::ViewingSession;
use sqlx::SqlitePool;

/// The instant every scenario starts at: 2025-01-15T14:30:00Z.
pub fn now() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap()
}

pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Timestamp {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

/// Build a session whose clock is pinned at [`now`].
pub fn session(pool: SqlitePool) -> (ViewingSession, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(now()));
    (ViewingSession::new(pool, clock.clone()), clock)
}

/// An 11-character external id derived from `n`.
pub fn video_id(n: usize) -> String {
    format!("vid{n:08}")
}

pub fn video(id: &str, channel: &str, duration_seconds: i64) -> CreateVideo {
    CreateVideo {
        video_id: id.to_string(),
        title: format!("Video {id}"),
        youtube_channel_id: channel.to_string(),
        youtube_channel_name: format!("Channel {channel}"),
        thumbnail_url: format!("https://i.ytimg.com/vi/{id}/mqdefault.jpg"),
        duration_seconds,
        published_at: at(2024, 6, 1, 12, 0, 0),
    }
}

pub async fn add_source(
    session: &ViewingSession,
    source_id: &str,
    videos: Vec<CreateVideo>,
) -> ContentSource {
    session
        .create_source(&CreateContentSource {
            source_id: source_id.to_string(),
            source_type: "channel".to_string(),
            name: format!("Source {source_id}"),
            videos,
        })
        .await
        .unwrap()
}

/// `channels` channels with `per_channel` videos each. Durations cycle
/// through `durations`.
pub async fn seed_catalog(
    session: &ViewingSession,
    channels: usize,
    per_channel: usize,
    durations: &[i64],
) -> Vec<String> {
    let mut ids = Vec::new();
    for c in 0..channels {
        let channel = format!("UCchannel{c}");
        let videos: Vec<CreateVideo> = (0..per_channel)
            .map(|v| {
                let n = c * per_channel + v;
                ids.push(video_id(n));
                video(&video_id(n), &channel, durations[n % durations.len()])
            })
            .collect();
        add_source(session, &format!("source-{c}"), videos).await;
    }
    ids
}

pub async fn insert_watch(
    pool: &SqlitePool,
    video_id: &str,
    watched_at: Timestamp,
    seconds: i64,
    completed: bool,
    manual_play: bool,
    grace_play: bool,
) {
    let mut conn = pool.acquire().await.unwrap();
    WatchEventRepo::create(
        &mut conn,
        &CreateWatchEvent {
            video_id: video_id.to_string(),
            video_title: "Seeded".to_string(),
            channel_name: "Seeded".to_string(),
            watched_at,
            completed,
            manual_play,
            grace_play,
            duration_watched_seconds: seconds,
        },
    )
    .await
    .unwrap();
}

/// Insert a countable watch at [`now`].
pub async fn watched_today(pool: &SqlitePool, seconds: i64) {
    insert_watch(pool, "seeded00001", now(), seconds, true, false, false).await;
}
