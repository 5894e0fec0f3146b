//! Daily viewing budget state machine.
//!
//! The state is never stored. It is recomputed on every read from three
//! inputs: today's countable watch seconds, the configured budget, and
//! whether today's grace video has been used.
//!
//! ```text
//! normal --(remaining <= 10)--> winddown --(remaining == 0)--> grace --(grace watched)--> locked
//!    ^                                                                                      |
//!    +------------------------------ next UTC midnight -------------------------------------+
//! ```

use serde::{Serialize, Serializer};

use crate::clock::UtcDay;
use crate::types::Timestamp;

/// Budget applied when the `daily_limit_minutes` setting is absent.
pub const DEFAULT_DAILY_LIMIT_MINUTES: i64 = 30;

/// Remaining minutes at or below which the session enters wind-down.
pub const WINDDOWN_THRESHOLD_MINUTES: i64 = 10;

/// Wire format of `resetTime`.
const RESET_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitState {
    Normal,
    Winddown,
    Grace,
    Locked,
}

impl LimitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitState::Normal => "normal",
            LimitState::Winddown => "winddown",
            LimitState::Grace => "grace",
            LimitState::Locked => "locked",
        }
    }
}

/// The limit-state payload published to the HTTP layer and the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLimit {
    pub date: UtcDay,
    pub minutes_watched: i64,
    pub minutes_remaining: i64,
    pub current_state: LimitState,
    #[serde(serialize_with = "serialize_reset_time")]
    pub reset_time: Timestamp,
    pub grace_available: bool,
}

fn serialize_reset_time<S: Serializer>(t: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&t.format(RESET_TIME_FORMAT))
}

/// Whole minutes watched. Partial minutes are floored, so a watch shorter
/// than 60 seconds contributes nothing.
pub fn minutes_from_seconds(seconds: i64) -> i64 {
    seconds.max(0) / 60
}

/// Map remaining minutes and grace usage to a state.
pub fn state_for(minutes_remaining: i64, grace_consumed_today: bool) -> LimitState {
    if minutes_remaining > WINDDOWN_THRESHOLD_MINUTES {
        LimitState::Normal
    } else if minutes_remaining > 0 {
        LimitState::Winddown
    } else if grace_consumed_today {
        LimitState::Locked
    } else {
        LimitState::Grace
    }
}

/// Derive the full limit payload for `today`.
pub fn evaluate(
    today: UtcDay,
    countable_seconds: i64,
    daily_limit_minutes: i64,
    grace_consumed_today: bool,
) -> DailyLimit {
    let minutes_watched = minutes_from_seconds(countable_seconds);
    let minutes_remaining = (daily_limit_minutes - minutes_watched).max(0);
    let current_state = state_for(minutes_remaining, grace_consumed_today);

    DailyLimit {
        date: today,
        minutes_watched,
        minutes_remaining,
        current_state,
        reset_time: today.next_reset(),
        grace_available: current_state == LimitState::Grace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> UtcDay {
        UtcDay::from_ymd(2025, 1, 15).unwrap()
    }

    fn state(minutes_watched: i64, grace_consumed: bool) -> LimitState {
        evaluate(today(), minutes_watched * 60, 30, grace_consumed).current_state
    }

    // -----------------------------------------------------------------------
    // Boundary table (30 minute budget)
    // -----------------------------------------------------------------------

    #[test]
    fn zero_watched_is_normal() {
        assert_eq!(state(0, false), LimitState::Normal);
    }

    #[test]
    fn nineteen_watched_is_normal() {
        assert_eq!(state(19, false), LimitState::Normal);
    }

    #[test]
    fn twenty_watched_is_winddown() {
        assert_eq!(state(20, false), LimitState::Winddown);
    }

    #[test]
    fn twenty_nine_watched_is_winddown() {
        assert_eq!(state(29, false), LimitState::Winddown);
    }

    #[test]
    fn thirty_watched_without_grace_is_grace() {
        assert_eq!(state(30, false), LimitState::Grace);
    }

    #[test]
    fn thirty_watched_with_grace_is_locked() {
        assert_eq!(state(30, true), LimitState::Locked);
    }

    #[test]
    fn grace_consumed_does_not_lock_while_budget_remains() {
        assert_eq!(state(5, true), LimitState::Normal);
        assert_eq!(state(25, true), LimitState::Winddown);
    }

    // -----------------------------------------------------------------------
    // Derived fields
    // -----------------------------------------------------------------------

    #[test]
    fn overshoot_clamps_remaining_to_zero() {
        let limit = evaluate(today(), 45 * 60, 30, false);
        assert_eq!(limit.minutes_watched, 45);
        assert_eq!(limit.minutes_remaining, 0);
        assert!(limit.grace_available);
    }

    #[test]
    fn partial_minutes_are_floored() {
        let limit = evaluate(today(), 20 * 60 - 1, 30, false);
        assert_eq!(limit.minutes_watched, 19);
        assert_eq!(limit.current_state, LimitState::Normal);
    }

    #[test]
    fn grace_available_only_in_grace() {
        assert!(!evaluate(today(), 0, 30, false).grace_available);
        assert!(!evaluate(today(), 1800, 30, true).grace_available);
        assert!(evaluate(today(), 1800, 30, false).grace_available);
    }

    #[test]
    fn winddown_at_exactly_ten_remaining() {
        let limit = evaluate(today(), 1200, 30, false);
        assert_eq!(limit.minutes_remaining, 10);
        assert_eq!(limit.current_state, LimitState::Winddown);
    }

    #[test]
    fn serializes_to_wire_shape() {
        let limit = evaluate(today(), 1200, 30, false);
        let json = serde_json::to_value(&limit).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "date": "2025-01-15",
                "minutesWatched": 20,
                "minutesRemaining": 10,
                "currentState": "winddown",
                "resetTime": "2025-01-16T00:00:00Z",
                "graceAvailable": false,
            })
        );
    }
}
