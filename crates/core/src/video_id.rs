//! External video id validation.
//!
//! The video platform identifies videos with an 11-character key drawn from
//! the URL-safe base64 alphabet.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Length of an external video id.
pub const VIDEO_ID_LEN: usize = 11;

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid regex"));

/// Returns `true` if `id` has the shape of an external video id.
pub fn is_valid_video_id(id: &str) -> bool {
    VIDEO_ID_RE.is_match(id)
}

pub fn validate_video_id(id: &str) -> Result<(), CoreError> {
    if is_valid_video_id(id) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid video id '{id}': expected {VIDEO_ID_LEN} characters of [A-Za-z0-9_-]"
        )))
    }
}
