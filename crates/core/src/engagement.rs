//! Engagement scoring for grid selection.
//!
//! Each candidate video gets a sampling weight derived from how the child
//! has engaged with it over the recent history window:
//!
//! ```text
//! weight = completion_rate * ln(1 + distinct_days) * recency_factor
//! ```
//!
//! Videos never watched get [`BASELINE_WEIGHT`]; every computed weight is
//! floored at [`MIN_WEIGHT`] so nothing in the catalog becomes unreachable.
//! Only countable watches feed these aggregates.

use std::collections::HashMap;

use crate::types::Timestamp;

/// Weight of a video with no countable history.
pub const BASELINE_WEIGHT: f64 = 0.5;

/// Lower bound for any computed weight.
pub const MIN_WEIGHT: f64 = 0.05;

/// Days of history the grid selector scores against.
pub const HISTORY_WINDOW_DAYS: u32 = 7;

const RECENT_HOURS: f64 = 24.0;
const WEEK_HOURS: f64 = 168.0;

/// Countable-watch aggregates for one external video id.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchStats {
    pub total_watches: i64,
    pub completed_watches: i64,
    pub distinct_days: i64,
    pub last_watched_at: Timestamp,
}

/// Dampen videos watched in the last day, lightly dampen the last week.
pub fn recency_factor(hours_since_last_watch: f64) -> f64 {
    if hours_since_last_watch < RECENT_HOURS {
        0.3
    } else if hours_since_last_watch < WEEK_HOURS {
        0.7
    } else {
        1.0
    }
}

/// Weight of a single video given its aggregates (if any).
pub fn score(stats: Option<&WatchStats>, now: Timestamp) -> f64 {
    let Some(stats) = stats.filter(|s| s.total_watches > 0) else {
        return BASELINE_WEIGHT;
    };

    let completion_rate = stats.completed_watches as f64 / stats.total_watches as f64;
    let replay_factor = (1.0 + stats.distinct_days.max(0) as f64).ln();
    let hours = (now - stats.last_watched_at).num_seconds().max(0) as f64 / 3600.0;

    let raw = completion_rate * replay_factor * recency_factor(hours);
    if raw.is_finite() {
        raw.max(MIN_WEIGHT)
    } else {
        MIN_WEIGHT
    }
}

/// Weight every id in `video_ids` against the history slice.
pub fn score_all<'a, I>(
    video_ids: I,
    history: &HashMap<String, WatchStats>,
    now: Timestamp,
) -> HashMap<String, f64>
where
    I: IntoIterator<Item = &'a str>,
{
    video_ids
        .into_iter()
        .map(|id| (id.to_string(), score(history.get(id), now)))
        .collect()
}
