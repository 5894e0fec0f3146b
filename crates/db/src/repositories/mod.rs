//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! `&mut SqliteConnection` as the first argument. Pass `&mut tx` for a
//! transaction or `&mut *pool.acquire().await?` for a one-off query.

pub mod banned_video_repo;
pub mod content_source_repo;
pub mod setting_repo;
pub mod video_repo;
pub mod watch_event_repo;

pub use banned_video_repo::BannedVideoRepo;
pub use content_source_repo::ContentSourceRepo;
pub use setting_repo::SettingRepo;
pub use video_repo::VideoRepo;
pub use watch_event_repo::WatchEventRepo;
