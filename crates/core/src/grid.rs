//! Grid composition: weighted sampling with a channel-variety cap, and the
//! short-video pick used for the grace video.

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::engagement::MIN_WEIGHT;

/// At most this many videos from one channel appear in a grid.
pub const MAX_VIDEOS_PER_CHANNEL: usize = 3;

/// Grace grids hold between this many ...
pub const GRACE_MIN_VIDEOS: usize = 4;

/// ... and this many videos.
pub const GRACE_MAX_VIDEOS: usize = 6;

/// Longest video offered as the grace video.
pub const GRACE_MAX_DURATION_SECONDS: i64 = 300;

/// What the sampler needs to know about a catalog entry.
pub trait GridCandidate {
    fn video_id(&self) -> &str;
    fn channel_id(&self) -> &str;
    fn duration_seconds(&self) -> i64;
}

/// Drop repeated external video ids, keeping the first occurrence.
///
/// The catalog stores one row per (video, source) pair, so the same video
/// can show up several times in a catalog query.
pub fn dedupe_by_video_id<T: GridCandidate>(pool: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    pool.into_iter()
        .filter(|c| seen.insert(c.video_id().to_string()))
        .collect()
}

/// Number of videos shown in a grace grid for a requested grid size.
pub fn grace_size(count: usize) -> usize {
    count.clamp(GRACE_MIN_VIDEOS, GRACE_MAX_VIDEOS)
}

/// The `take` shortest candidates, ascending by duration. Ties keep their
/// catalog order.
pub fn shortest_first<T: GridCandidate>(mut pool: Vec<T>, take: usize) -> Vec<T> {
    pool.sort_by_key(|c| c.duration_seconds());
    pool.truncate(take);
    pool
}

/// Draw up to `count` candidates without replacement, proportionally to
/// `weights`, then shuffle the result.
///
/// Each draw only considers channels still below
/// [`MAX_VIDEOS_PER_CHANNEL`]. When every remaining candidate belongs to a
/// capped channel the cap is relaxed so the grid can still fill.
///
/// `weights` is indexed like `pool`; missing or non-positive weights fall
/// back to [`MIN_WEIGHT`].
pub fn sample_weighted<T, R>(pool: Vec<T>, weights: &[f64], count: usize, rng: &mut R) -> Vec<T>
where
    T: GridCandidate,
    R: Rng,
{
    let mut remaining: Vec<(T, f64)> = pool
        .into_iter()
        .enumerate()
        .map(|(i, c)| {
            let w = weights.get(i).copied().unwrap_or(MIN_WEIGHT);
            (c, if w.is_finite() && w > 0.0 { w } else { MIN_WEIGHT })
        })
        .collect();

    let mut per_channel: HashMap<String, usize> = HashMap::new();
    let mut selected = Vec::with_capacity(count.min(remaining.len()));

    while selected.len() < count && !remaining.is_empty() {
        let mut eligible: Vec<usize> = remaining
            .iter()
            .enumerate()
            .filter(|(_, (c, _))| {
                per_channel.get(c.channel_id()).copied().unwrap_or(0) < MAX_VIDEOS_PER_CHANNEL
            })
            .map(|(i, _)| i)
            .collect();
        if eligible.is_empty() {
            eligible = (0..remaining.len()).collect();
        }

        let idx = pick_weighted(&eligible, &remaining, rng);
        let (chosen, _) = remaining.swap_remove(idx);
        *per_channel.entry(chosen.channel_id().to_string()).or_insert(0) += 1;
        selected.push(chosen);
    }

    selected.shuffle(rng);
    selected
}

fn pick_weighted<T, R>(eligible: &[usize], remaining: &[(T, f64)], rng: &mut R) -> usize
where
    R: Rng,
{
    let total: f64 = eligible.iter().map(|&i| remaining[i].1).sum();
    let mut target = rng.random_range(0.0..total);
    for &i in eligible {
        let w = remaining[i].1;
        if target < w {
            return i;
        }
        target -= w;
    }
    // Floating-point slack lands past the end.
    eligible[eligible.len() - 1]
}
