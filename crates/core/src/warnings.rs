//! Countdown warnings reported by the player.

use crate::error::CoreError;

pub const WARNING_FIVE_MINUTES: &str = "5min";
pub const WARNING_TWO_MINUTES: &str = "2min";
pub const WARNING_ONE_MINUTE: &str = "1min";

pub const VALID_WARNING_TYPES: &[&str] =
    &[WARNING_FIVE_MINUTES, WARNING_TWO_MINUTES, WARNING_ONE_MINUTE];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningType {
    FiveMinutes,
    TwoMinutes,
    OneMinute,
}

impl WarningType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::FiveMinutes => WARNING_FIVE_MINUTES,
            WarningType::TwoMinutes => WARNING_TWO_MINUTES,
            WarningType::OneMinute => WARNING_ONE_MINUTE,
        }
    }
}

pub fn parse_warning_type(s: &str) -> Result<WarningType, CoreError> {
    match s {
        WARNING_FIVE_MINUTES => Ok(WarningType::FiveMinutes),
        WARNING_TWO_MINUTES => Ok(WarningType::TwoMinutes),
        WARNING_ONE_MINUTE => Ok(WarningType::OneMinute),
        _ => Err(CoreError::Validation(format!(
            "Unknown warning type: '{s}'. Valid types: {}",
            VALID_WARNING_TYPES.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_types() {
        for s in VALID_WARNING_TYPES {
            assert_eq!(parse_warning_type(s).unwrap().as_str(), *s);
        }
    }

    #[test]
    fn rejects_unknown_types() {
        assert!(parse_warning_type("10min").is_err());
        assert!(parse_warning_type("").is_err());
    }
}
