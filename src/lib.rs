//! `lyricstamp` - step through lyrics while a track plays and record when each line starts.
//!
//! The crate turns plain lyric lines (optionally paired with annotation lines such
//! as translations) into a timestamped `.lrcx` document, reading positions from a
//! media player and falling back to its own clock when the player does not answer.

// Re-export public modules for use in integration tests and as a library
pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod lyrics;
pub mod player;
pub mod services;
pub mod session;
pub mod sources;
pub mod types;
pub mod ui;
