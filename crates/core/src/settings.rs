//! Keys, defaults and validation for the `settings` key-value store.
//!
//! Values are stored JSON-encoded. Only the keys below are interpreted;
//! `admin_password_hash` belongs to the authentication layer and is never
//! read here.

use serde_json::Value;

use crate::daily_limit::DEFAULT_DAILY_LIMIT_MINUTES;
use crate::error::CoreError;

pub const KEY_DAILY_LIMIT_MINUTES: &str = "daily_limit_minutes";
pub const KEY_GRID_SIZE: &str = "grid_size";

pub const DEFAULT_GRID_SIZE: i64 = 9;

/// Largest accepted daily budget: one full day.
pub const MAX_DAILY_LIMIT_MINUTES: i64 = 1440;

pub const MAX_GRID_SIZE: i64 = 50;

/// Default applied when an integer setting is missing or unreadable.
pub fn default_for(key: &str) -> Option<i64> {
    match key {
        KEY_DAILY_LIMIT_MINUTES => Some(DEFAULT_DAILY_LIMIT_MINUTES),
        KEY_GRID_SIZE => Some(DEFAULT_GRID_SIZE),
        _ => None,
    }
}

/// Decode a stored JSON value as a positive integer.
///
/// Accepts a JSON number or a numeric string (older rows were written as
/// strings). Returns `None` for anything else.
pub fn decode_positive_int(raw: &str) -> Option<i64> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let n = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (n > 0).then_some(n)
}

/// Validate an integer setting before it is written.
pub fn validate_int_setting(key: &str, value: i64) -> Result<(), CoreError> {
    let max = match key {
        KEY_DAILY_LIMIT_MINUTES => MAX_DAILY_LIMIT_MINUTES,
        KEY_GRID_SIZE => MAX_GRID_SIZE,
        _ => {
            return Err(CoreError::Validation(format!("Unknown setting: '{key}'")));
        }
    };
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{key} must be between 1 and {max}, got {value}"
        )))
    }
}
