//! Core type definitions for compile-time safety.
//!
//! This module provides the [`Timestamp`] value recorded against lyric lines and
//! small newtype wrappers used across sessions and file naming.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::lyrics::{LRCX_EXTENSION, UNSAFE_FILENAME_CHARS};
use crate::error::Error;

/// Elapsed playback time at millisecond resolution, rendered as `[MM:SS.mmm]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The canonical start-of-playback timestamp, `[00:00.000]`.
    pub const ZERO: Self = Self(0);

    /// Create a timestamp from whole milliseconds.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Create a timestamp from a duration, truncating below one millisecond.
    #[must_use]
    pub fn from_duration(duration: Duration) -> Self {
        Self(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    /// Create a timestamp from fractional seconds as reported by players.
    ///
    /// Negative and non-finite values clamp to zero.
    #[must_use]
    pub fn from_secs_f64(secs: f64) -> Self {
        if secs.is_finite() && secs > 0.0 {
            Self::from_duration(Duration::from_secs_f64(secs))
        } else {
            Self::ZERO
        }
    }

    /// Whole milliseconds.
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// As a standard duration.
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }

    /// Build from already-split fields, rejecting out-of-range seconds or milliseconds.
    #[must_use]
    pub fn from_parts(minutes: u64, seconds: u64, millis: u64) -> Option<Self> {
        if seconds >= 60 || millis >= 1000 {
            return None;
        }
        minutes
            .checked_mul(60_000)
            .and_then(|m| m.checked_add(seconds * 1000 + millis))
            .map(Self)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.0 / 60_000;
        let seconds = (self.0 / 1000) % 60;
        let millis = self.0 % 1000;
        write!(f, "[{minutes:02}:{seconds:02}.{millis:03}]")
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    /// Parse exactly one bracketed timestamp such as `[03:07.250]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match crate::lyrics::lrcx::split_timestamp(s) {
            Some((ts, "")) => Ok(ts),
            _ => Err(Error::Msg(format!("Not a timestamp: {s:?}"))),
        }
    }
}

impl From<Duration> for Timestamp {
    fn from(d: Duration) -> Self {
        Self::from_duration(d)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Title and artist of the track the player reports as current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongInfo {
    /// Track title.
    pub title: String,
    /// Track artist.
    pub artist: String,
}

impl SongInfo {
    /// Create song info from title and artist.
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Header line placed at the top of a lyric document.
    #[must_use]
    pub fn header(&self) -> String {
        format!("{} - {}", self.title, self.artist)
    }

    /// Conventional `<title> - <artist>.lrcx` file name with path-unsafe characters removed.
    #[must_use]
    pub fn file_name(&self) -> String {
        let clean = |s: &str| -> String {
            s.chars()
                .filter(|c| !UNSAFE_FILENAME_CHARS.contains(c) && !c.is_control())
                .collect::<String>()
                .trim()
                .to_string()
        };
        let title = clean(&self.title);
        let artist = clean(&self.artist);
        let stem = match (title.is_empty(), artist.is_empty()) {
            (true, true) => "untitled".to_string(),
            (false, true) => title,
            (true, false) => artist,
            (false, false) => format!("{title} - {artist}"),
        };
        format!("{stem}.{LRCX_EXTENSION}")
    }
}

impl Default for SongInfo {
    fn default() -> Self {
        Self::new("Unknown Title", "Unknown Artist")
    }
}

/// Identifier for a hosted alignment session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl SessionId {
    /// Create a new random `SessionId`.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn timestamp_renders_padded_fields() {
        assert_eq!(Timestamp::ZERO.to_string(), "[00:00.000]");
        assert_eq!(Timestamp::from_millis(2500).to_string(), "[00:02.500]");
        assert_eq!(Timestamp::from_millis(61_007).to_string(), "[01:01.007]");
    }

    #[test]
    fn timestamp_minutes_grow_past_two_digits() {
        let ts = Timestamp::from_millis(125 * 60_000 + 9_050);
        assert_eq!(ts.to_string(), "[125:09.050]");
    }

    #[test]
    fn timestamp_truncates_sub_millisecond() {
        let ts = Timestamp::from_duration(Duration::from_micros(1_999));
        assert_eq!(ts.as_millis(), 1);
        assert_eq!(Timestamp::from_secs_f64(-3.0), Timestamp::ZERO);
        assert_eq!(Timestamp::from_secs_f64(f64::NAN), Timestamp::ZERO);
    }

    #[test]
    fn timestamp_from_str_requires_whole_bracket() {
        let ts: Timestamp = "[03:07.250]".parse().unwrap();
        assert_eq!(ts.as_millis(), 187_250);
        assert!("[03:07.250]extra".parse::<Timestamp>().is_err());
        assert!("03:07.250".parse::<Timestamp>().is_err());
    }

    #[test]
    fn from_parts_rejects_overflowing_fields() {
        assert!(Timestamp::from_parts(0, 60, 0).is_none());
        assert!(Timestamp::from_parts(0, 0, 1000).is_none());
        assert_eq!(Timestamp::from_parts(1, 2, 3), Some(Timestamp::from_millis(62_003)));
    }

    #[test]
    fn song_file_name_strips_unsafe_characters() {
        let song = SongInfo::new("AC/DC: Live?", "Some \"Band\"");
        assert_eq!(song.file_name(), "ACDC Live - Some Band.lrcx");
        assert_eq!(song.header(), "AC/DC: Live? - Some \"Band\"");
        assert_eq!(SongInfo::new("", "").file_name(), "untitled.lrcx");
    }

    #[test]
    fn generated_session_ids_differ() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }
}
