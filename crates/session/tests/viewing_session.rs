//! End-to-end behaviour of the viewing-session engine against a real
//! SQLite database, with the clock pinned at 2025-01-15T14:30:00Z and the
//! default 30 minute budget.

mod common;

use std::collections::{HashMap, HashSet};

use assert_matches::assert_matches;
use kidscreen_core::daily_limit::LimitState;
use kidscreen_core::error::CoreError;
use kidscreen_db::repositories::VideoRepo;
use kidscreen_session::{RecordWatch, SessionError};
use sqlx::SqlitePool;

use common::{add_source, at, insert_watch, now, seed_catalog, session, video, watched_today};

fn max_per_channel(videos: &[kidscreen_db::models::video::VideoCard]) -> usize {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in videos {
        *counts.entry(v.youtube_channel_id.as_str()).or_insert(0) += 1;
    }
    counts.values().copied().max().unwrap_or(0)
}

fn watch(video_id: &str, seconds: i64) -> RecordWatch {
    RecordWatch {
        video_id: video_id.to_string(),
        completed: true,
        duration_watched_seconds: seconds,
        manual_play: false,
        grace_play: false,
    }
}

// ---------------------------------------------------------------------------
// Scenario 1: cold start
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn cold_start_fills_grid_with_channel_variety(pool: SqlitePool) {
    let (session, _clock) = session(pool);
    seed_catalog(&session, 5, 3, &[120, 240, 480]).await;

    let grid = session.select_grid(9, None).await.unwrap();

    assert_eq!(grid.videos.len(), 9);
    assert!(max_per_channel(&grid.videos) <= 3);
    let ids: HashSet<_> = grid.videos.iter().map(|v| v.video_id.clone()).collect();
    assert_eq!(ids.len(), 9, "grid must not repeat a video");
    assert_eq!(grid.daily_limit.current_state, LimitState::Normal);
    assert_eq!(grid.daily_limit.minutes_watched, 0);
}

// ---------------------------------------------------------------------------
// Scenario 2: wind-down filter
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn winddown_grid_respects_duration_cap(pool: SqlitePool) {
    let (session, _clock) = session(pool.clone());
    seed_catalog(&session, 5, 4, &[300, 600, 900, 1200]).await;
    watched_today(&pool, 1200).await;

    let limit = session.daily_limit().await.unwrap();
    assert_eq!(limit.current_state, LimitState::Winddown);
    assert_eq!(limit.minutes_remaining, 10);

    let grid = session.select_grid(9, Some(600)).await.unwrap();
    assert!(!grid.videos.is_empty());
    assert!(grid.videos.iter().all(|v| v.duration_seconds <= 600));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn winddown_falls_back_to_full_catalog(pool: SqlitePool) {
    let (session, _clock) = session(pool.clone());
    seed_catalog(&session, 3, 3, &[1800]).await;
    watched_today(&pool, 1200).await;

    let grid = session.select_grid(9, Some(600)).await.unwrap();
    assert_eq!(grid.videos.len(), 9);
    assert_eq!(grid.daily_limit.current_state, LimitState::Winddown);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn child_grid_applies_winddown_cap_automatically(pool: SqlitePool) {
    let (session, _clock) = session(pool.clone());
    seed_catalog(&session, 5, 4, &[300, 600, 900, 1200]).await;
    watched_today(&pool, 1500).await;

    let grid = session.select_child_grid(None).await.unwrap();
    assert_eq!(grid.daily_limit.minutes_remaining, 5);
    assert!(!grid.videos.is_empty());
    assert!(grid.videos.iter().all(|v| v.duration_seconds <= 300));
}

// ---------------------------------------------------------------------------
// Scenario 3: grace offer
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn grace_offers_shortest_videos_ascending(pool: SqlitePool) {
    let (session, _clock) = session(pool.clone());
    seed_catalog(&session, 4, 3, &[290, 60, 600, 180, 900, 240, 45, 1200]).await;
    watched_today(&pool, 1800).await;

    let limit = session.daily_limit().await.unwrap();
    assert_eq!(limit.current_state, LimitState::Grace);
    assert!(limit.grace_available);

    let grid = session.select_grid(6, None).await.unwrap();
    assert!((4..=6).contains(&grid.videos.len()), "got {}", grid.videos.len());
    assert!(grid.videos.iter().all(|v| v.duration_seconds <= 300));
    let durations: Vec<i64> = grid.videos.iter().map(|v| v.duration_seconds).collect();
    let mut sorted = durations.clone();
    sorted.sort_unstable();
    assert_eq!(durations, sorted);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn grace_falls_back_to_shortest_when_nothing_is_short(pool: SqlitePool) {
    let (session, _clock) = session(pool.clone());
    seed_catalog(&session, 2, 4, &[900, 600, 1200, 700]).await;
    watched_today(&pool, 1800).await;

    let grid = session.select_grid(6, None).await.unwrap();
    assert_eq!(grid.videos.len(), 6);
    assert_eq!(grid.videos[0].duration_seconds, 600);
}

// ---------------------------------------------------------------------------
// Scenario 4: locked, then midnight rollover
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn locked_returns_empty_until_midnight(pool: SqlitePool) {
    let (session, clock) = session(pool.clone());
    seed_catalog(&session, 3, 3, &[120]).await;
    watched_today(&pool, 1800).await;
    insert_watch(&pool, "grace000001", now(), 120, true, false, true).await;

    let grid = session.select_grid(9, None).await.unwrap();
    assert_eq!(grid.daily_limit.current_state, LimitState::Locked);
    assert!(!grid.daily_limit.grace_available);
    assert!(grid.videos.is_empty());

    clock.set(at(2025, 1, 16, 0, 0, 1));
    let grid = session.select_grid(9, None).await.unwrap();
    assert_eq!(grid.daily_limit.current_state, LimitState::Normal);
    assert_eq!(grid.daily_limit.date.to_string(), "2025-01-16");
    assert!(!grid.videos.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn recording_grace_video_locks_the_day(pool: SqlitePool) {
    let (session, _clock) = session(pool.clone());
    seed_catalog(&session, 2, 3, &[120]).await;
    watched_today(&pool, 1800).await;

    let mut grace = watch("vid00000000", 120);
    grace.grace_play = true;
    let limit = session.record_watch(&grace).await.unwrap();

    assert_eq!(limit.current_state, LimitState::Locked);
    assert_eq!(limit.minutes_watched, 30);
}

// ---------------------------------------------------------------------------
// Scenario 5: unavailability propagates to duplicates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_unavailable_flips_every_duplicate(pool: SqlitePool) {
    let (session, _clock) = session(pool.clone());
    add_source(
        &session,
        "source-a",
        vec![video("NsKaCS3CtsY", "UCa", 120), video("vid00000001", "UCa", 120)],
    )
    .await;
    add_source(
        &session,
        "source-b",
        vec![video("NsKaCS3CtsY", "UCb", 120), video("vid00000002", "UCb", 120)],
    )
    .await;

    let changed = session.mark_unavailable("NsKaCS3CtsY").await.unwrap();
    assert_eq!(changed, 2);

    let mut conn = pool.acquire().await.unwrap();
    assert_eq!(VideoRepo::count_by_video_id(&mut conn, "NsKaCS3CtsY").await.unwrap(), 2);
    let still_available: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM videos WHERE video_id = ?1 AND is_available = 1",
    )
    .bind("NsKaCS3CtsY")
    .fetch_one(&mut *conn)
    .await
    .unwrap();
    assert_eq!(still_available, 0);
    drop(conn);

    for _ in 0..10 {
        let grid = session.select_grid(9, None).await.unwrap();
        assert!(grid.videos.iter().all(|v| v.video_id != "NsKaCS3CtsY"));
        assert_eq!(grid.videos.len(), 2);
    }

    let again = session.mark_unavailable("NsKaCS3CtsY").await.unwrap();
    assert_eq!(again, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_unavailable_unknown_id_is_not_found(pool: SqlitePool) {
    let (session, _clock) = session(pool);
    let err = session.mark_unavailable("zzzzzzzzzzz").await.unwrap_err();
    assert_matches!(err, SessionError::Core(CoreError::NotFound { .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_unavailable_rejects_malformed_id(pool: SqlitePool) {
    let (session, _clock) = session(pool);
    let err = session.mark_unavailable("nope").await.unwrap_err();
    assert_matches!(err, SessionError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn banned_videos_are_never_selected(pool: SqlitePool) {
    let (session, _clock) = session(pool);
    let ids = seed_catalog(&session, 4, 3, &[120]).await;
    let banned: HashSet<String> = ids.iter().take(5).cloned().collect();
    for id in &banned {
        session.ban_video(id).await.unwrap();
    }

    for _ in 0..10 {
        let grid = session.select_grid(9, None).await.unwrap();
        assert_eq!(grid.videos.len(), 7);
        assert!(grid.videos.iter().all(|v| !banned.contains(&v.video_id)));
    }
}

// ---------------------------------------------------------------------------
// Scenario 6: reset preserves the audit trail
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn reset_keeps_manual_and_grace_events(pool: SqlitePool) {
    let (session, _clock) = session(pool.clone());
    seed_catalog(&session, 3, 3, &[120]).await;
    insert_watch(&pool, "count000001", now(), 900, true, false, false).await;
    insert_watch(&pool, "manual00001", now(), 600, true, true, false).await;
    insert_watch(&pool, "grace000001", now(), 300, true, false, true).await;

    let limit = session.reset_today().await.unwrap();
    assert_eq!(limit.minutes_watched, 0);

    let events = session.history_for_day("2025-01-15").await.unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().any(|e| e.manual_play));
    assert!(events.iter().any(|e| e.grace_play));

    let grid = session.select_grid(9, None).await.unwrap();
    assert_eq!(grid.daily_limit.current_state, LimitState::Normal);
    assert!(!grid.videos.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reset_leaves_other_days_alone(pool: SqlitePool) {
    let (session, _clock) = session(pool.clone());
    insert_watch(&pool, "yesterday01", at(2025, 1, 14, 23, 59, 59), 600, true, false, false).await;
    watched_today(&pool, 600).await;

    session.reset_today().await.unwrap();

    let yesterday = session.history_for_day("2025-01-14").await.unwrap();
    assert_eq!(yesterday.len(), 1);
}

// ---------------------------------------------------------------------------
// Watch recording
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn countable_watch_consumes_budget(pool: SqlitePool) {
    let (session, _clock) = session(pool);
    seed_catalog(&session, 1, 1, &[600]).await;

    let limit = session.record_watch(&watch("vid00000000", 659)).await.unwrap();
    assert_eq!(limit.minutes_watched, 10);
    assert_eq!(limit.minutes_remaining, 20);
    assert_eq!(limit.current_state, LimitState::Normal);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn flagged_watches_leave_budget_unchanged(pool: SqlitePool) {
    let (session, _clock) = session(pool);
    let before = session.daily_limit().await.unwrap();

    let mut manual = watch("vid00000000", 900);
    manual.manual_play = true;
    let after_manual = session.record_watch(&manual).await.unwrap();
    assert_eq!(after_manual.minutes_watched, before.minutes_watched);

    let mut grace = watch("vid00000001", 300);
    grace.grace_play = true;
    let after_grace = session.record_watch(&grace).await.unwrap();
    assert_eq!(after_grace.minutes_watched, before.minutes_watched);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn watch_of_unknown_video_is_recorded(pool: SqlitePool) {
    let (session, _clock) = session(pool.clone());
    session.record_watch(&watch("notincatalo", 120)).await.unwrap();

    let events = session.history_for_day("2025-01-15").await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].video_title, "Unknown video");
    assert_eq!(events[0].watched_at, now());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn watch_snapshots_catalog_title(pool: SqlitePool) {
    let (session, _clock) = session(pool.clone());
    add_source(&session, "source-a", vec![video("NsKaCS3CtsY", "UCa", 120)]).await;
    session.record_watch(&watch("NsKaCS3CtsY", 120)).await.unwrap();

    let events = session.history_for_day("2025-01-15").await.unwrap();
    assert_eq!(events[0].video_title, "Video NsKaCS3CtsY");
    assert_eq!(events[0].channel_name, "Channel UCa");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn negative_duration_is_rejected(pool: SqlitePool) {
    let (session, _clock) = session(pool);
    let err = session.record_watch(&watch("vid00000000", -1)).await.unwrap_err();
    assert_matches!(err, SessionError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn yesterday_late_watch_does_not_count_today(pool: SqlitePool) {
    let (session, _clock) = session(pool.clone());
    insert_watch(&pool, "late0000001", at(2025, 1, 14, 23, 59, 59), 1800, true, false, false).await;

    let limit = session.daily_limit().await.unwrap();
    assert_eq!(limit.minutes_watched, 0);
    assert_eq!(limit.current_state, LimitState::Normal);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn budget_follows_daily_limit_setting(pool: SqlitePool) {
    let (session, _clock) = session(pool.clone());
    session
        .update_settings(&kidscreen_session::curator::UpdateSettings {
            daily_limit_minutes: Some(60),
            grid_size: None,
        })
        .await
        .unwrap();
    watched_today(&pool, 1800).await;

    let limit = session.daily_limit().await.unwrap();
    assert_eq!(limit.minutes_remaining, 30);
    assert_eq!(limit.current_state, LimitState::Normal);
}

// ---------------------------------------------------------------------------
// Grid failures
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_catalog_reports_no_videos(pool: SqlitePool) {
    let (session, _clock) = session(pool);
    let err = session.select_grid(9, None).await.unwrap_err();
    assert_matches!(err, SessionError::Core(CoreError::NoVideosAvailable));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn zero_count_is_rejected(pool: SqlitePool) {
    let (session, _clock) = session(pool);
    let err = session.select_grid(0, None).await.unwrap_err();
    assert_matches!(err, SessionError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_rows_appear_once_in_grid(pool: SqlitePool) {
    let (session, _clock) = session(pool);
    add_source(&session, "source-a", vec![video("NsKaCS3CtsY", "UCa", 120)]).await;
    add_source(&session, "source-b", vec![video("NsKaCS3CtsY", "UCa", 120)]).await;

    let grid = session.select_grid(9, None).await.unwrap();
    assert_eq!(grid.videos.len(), 1);
}

// ---------------------------------------------------------------------------
// Playback checks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn playback_check_uses_remaining_budget(pool: SqlitePool) {
    let (session, _clock) = session(pool.clone());
    watched_today(&pool, 28 * 60).await;

    // 2 minutes left: a 5 minute video fits the courtesy tail.
    let check = session.check_playback(5 * 60).await.unwrap();
    assert!(!check.interrupt);
    assert_eq!(check.daily_limit.minutes_remaining, 2);

    let check = session.check_playback(10 * 60).await.unwrap();
    assert!(check.interrupt);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn playback_check_rejects_non_positive_duration(pool: SqlitePool) {
    let (session, _clock) = session(pool);
    let err = session.check_playback(0).await.unwrap_err();
    assert_matches!(err, SessionError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn warning_types_are_validated(pool: SqlitePool) {
    let (session, _clock) = session(pool);
    assert!(session.report_warning("5min").await.is_ok());
    let err = session.report_warning("soon").await.unwrap_err();
    assert_matches!(err, SessionError::Core(CoreError::Validation(_)));
}
