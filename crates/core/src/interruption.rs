//! Mid-video interruption when the budget runs out during playback.

use crate::error::CoreError;

/// Minutes a video may run past the budget before it gets cut off.
pub const COURTESY_TAIL_MINUTES: i64 = 5;

/// Whether a video of `video_duration_minutes` must be interrupted when only
/// `minutes_remaining` of the budget is left.
///
/// Negative `minutes_remaining` is treated as zero. Durations must be
/// positive.
pub fn should_interrupt(minutes_remaining: i64, video_duration_minutes: i64) -> Result<bool, CoreError> {
    if video_duration_minutes <= 0 {
        return Err(CoreError::Validation(format!(
            "Video duration must be positive, got {video_duration_minutes} minutes"
        )));
    }
    Ok(video_duration_minutes > minutes_remaining.max(0) + COURTESY_TAIL_MINUTES)
}

/// Whole minutes needed to play `seconds`, rounding partial minutes up.
pub fn duration_minutes(seconds: i64) -> i64 {
    if seconds <= 0 {
        0
    } else {
        (seconds + 59) / 60
    }
}
