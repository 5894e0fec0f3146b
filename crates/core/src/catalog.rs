//! Content-source kinds and catalog input validation.

use crate::error::CoreError;
use crate::video_id::validate_video_id;

/// A whole channel registered by the curator.
pub const SOURCE_KIND_CHANNEL: &str = "channel";

/// A single playlist registered by the curator.
pub const SOURCE_KIND_PLAYLIST: &str = "playlist";

/// All valid source kinds.
pub const VALID_SOURCE_KINDS: &[&str] = &[SOURCE_KIND_CHANNEL, SOURCE_KIND_PLAYLIST];

/// Returns `true` if the given string is a valid source kind.
pub fn is_valid_source_kind(s: &str) -> bool {
    VALID_SOURCE_KINDS.contains(&s)
}

pub fn validate_source_kind(kind: &str) -> Result<(), CoreError> {
    if is_valid_source_kind(kind) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown source kind: '{kind}'. Valid kinds: {}",
            VALID_SOURCE_KINDS.join(", ")
        )))
    }
}

/// Validate the fields of a video about to be ingested into the catalog.
pub fn validate_catalog_video(
    video_id: &str,
    title: &str,
    duration_seconds: i64,
) -> Result<(), CoreError> {
    validate_video_id(video_id)?;
    if title.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "Video {video_id} has an empty title"
        )));
    }
    if duration_seconds <= 0 {
        return Err(CoreError::Validation(format!(
            "Video {video_id} must have a positive duration, got {duration_seconds}"
        )));
    }
    Ok(())
}
