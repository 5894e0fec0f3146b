//! Time source and the UTC day type.
//!
//! Every date computation in the engine goes through a [`Clock`] and is
//! reduced to a [`UtcDay`]. Local time never enters the picture: "today" is
//! the UTC calendar date of `Clock::now()` and the daily budget resets at the
//! next UTC midnight.

use std::fmt;
use std::sync::Mutex;

use chrono::{Days, NaiveDate, NaiveTime, SubsecRound, Utc};
use serde::{Serialize, Serializer};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Format used for day strings on the wire and in SQL predicates.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock, truncated to whole seconds.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now().trunc_subsecs(0)
    }
}

/// A clock that only moves when told to. Used to pin `now` in tests and
/// in tooling that replays a fixed day.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: Timestamp) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ---------------------------------------------------------------------------
// UtcDay
// ---------------------------------------------------------------------------

/// A calendar date that is always derived in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDay(NaiveDate);

impl UtcDay {
    /// The UTC date containing `instant`.
    pub fn of(instant: &Timestamp) -> Self {
        Self(instant.date_naive())
    }

    /// Today according to `clock`.
    pub fn today(clock: &dyn Clock) -> Self {
        Self::of(&clock.now())
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse a strict `YYYY-MM-DD` string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::Validation(format!("Invalid date '{s}': expected YYYY-MM-DD"));
        if s.len() != 10 {
            return Err(invalid());
        }
        NaiveDate::parse_from_str(s, DAY_FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// 00:00:00 UTC on this day.
    pub fn start(&self) -> Timestamp {
        self.0.and_time(NaiveTime::MIN).and_utc()
    }

    pub fn next(&self) -> Self {
        Self(self.0.succ_opt().unwrap_or(NaiveDate::MAX))
    }

    /// The instant the daily budget for this day resets.
    pub fn next_reset(&self) -> Timestamp {
        self.next().start()
    }

    pub fn days_before(&self, days: u32) -> Self {
        Self(
            self.0
                .checked_sub_days(Days::new(u64::from(days)))
                .unwrap_or(NaiveDate::MIN),
        )
    }

    /// First day of the inclusive window `[self - days_back + 1, self]`.
    ///
    /// A window of zero days is treated as a window of one.
    pub fn window_start(&self, days_back: u32) -> Self {
        self.days_before(days_back.saturating_sub(1))
    }
}

impl fmt::Display for UtcDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl Serialize for UtcDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
