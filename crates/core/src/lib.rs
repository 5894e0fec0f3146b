//! Domain logic for the kidscreen viewing-session engine.
//!
//! Everything in this crate is pure and synchronous: the limit state
//! machine, the engagement scorer, the grid sampler and the validation
//! helpers. Persistence lives in `kidscreen-db`; the two are composed by
//! `kidscreen-session`.

pub mod catalog;
pub mod clock;
pub mod daily_limit;
pub mod engagement;
pub mod error;
pub mod grid;
pub mod interruption;
pub mod settings;
pub mod types;
pub mod video_id;
pub mod warnings;
