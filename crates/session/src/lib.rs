//! The viewing-session engine.
//!
//! [`ViewingSession`] composes the pure domain logic of `kidscreen-core`
//! with the SQLite repositories of `kidscreen-db`. Every public operation
//! opens exactly one transaction, does all of its reads and writes inside
//! it, and commits at the end; an early return drops the transaction and
//! rolls it back.

pub mod curator;
pub mod error;
pub mod session;

pub use error::{SessionError, SessionResult};
pub use session::{Grid, PlaybackCheck, RecordWatch, ViewingSession};
