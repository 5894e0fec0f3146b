//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity matching its table and, where
//! the table is written to, a create DTO. Wire-facing structs serialize in
//! camelCase.

pub mod banned_video;
pub mod content_source;
pub mod setting;
pub mod video;
pub mod watch_event;
