//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::paths::DEFAULT_LYRICS_SUBDIR;
use crate::constants::player::{DEFAULT_CONTROL_TIMEOUT_MS, DEFAULT_PLAYER_APP};
use crate::error::{Error, Result};
use crate::session::SessionOptions;

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Directory saved `.lrcx` files (and the log file) go into
    pub lyrics_dir: PathBuf,
    /// Player application controlled through AppleScript
    pub player_app: String,
    /// Limit for each player query or command
    pub control_timeout: Duration,
    /// Seek the player back when a timestamp is undone
    pub seek_on_retreat: bool,
    /// Shell command that turns lyric lines into annotation lines
    pub annotation_command: Option<String>,
    /// `tracing` filter directive for the log file
    pub log_filter: String,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    /// Options for new alignment sessions.
    pub const fn session_options(&self) -> SessionOptions {
        SessionOptions {
            control_timeout: self.control_timeout,
            seek_on_retreat: self.seek_on_retreat,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            lyrics_dir: default_lyrics_dir(),
            player_app: DEFAULT_PLAYER_APP.to_string(),
            control_timeout: Duration::from_millis(DEFAULT_CONTROL_TIMEOUT_MS),
            seek_on_retreat: true,
            annotation_command: None,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup("LYRICS_DIR") {
            config.lyrics_dir = PathBuf::from(shellexpand::tilde(&dir).to_string());
        }

        if let Some(app) = lookup("PLAYER_APP").filter(|a| !a.trim().is_empty()) {
            config.player_app = app;
        }

        if let Some(ms) = lookup("CONTROL_TIMEOUT_MS") {
            let ms: u64 = ms.trim().parse().map_err(|_| {
                Error::config(
                    format!("CONTROL_TIMEOUT_MS={ms:?} is not a number"),
                    "Set it to a whole number of milliseconds, e.g. 2000",
                )
            })?;
            if ms == 0 {
                return Err(Error::config(
                    "CONTROL_TIMEOUT_MS must be positive",
                    "Set it to a whole number of milliseconds, e.g. 2000",
                ));
            }
            config.control_timeout = Duration::from_millis(ms);
        }

        if let Some(flag) = lookup("SEEK_ON_RETREAT") {
            config.seek_on_retreat = parse_flag(&flag).ok_or_else(|| {
                Error::config(
                    format!("SEEK_ON_RETREAT={flag:?} is not a boolean"),
                    "Use true/false, yes/no or 1/0",
                )
            })?;
        }

        config.annotation_command = lookup("ANNOTATION_COMMAND").filter(|c| !c.trim().is_empty());

        if let Some(filter) = lookup("LYRICSTAMP_LOG") {
            config.log_filter = filter;
        }

        Ok(config)
    }
}

/// `~/Music/LyricsX`, or a relative `LyricsX` when no home directory is known.
fn default_lyrics_dir() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from("LyricsX"), |h| h.join(DEFAULT_LYRICS_SUBDIR))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.player_app, "Music");
        assert_eq!(config.control_timeout, Duration::from_millis(2000));
        assert!(config.seek_on_retreat);
        assert!(config.annotation_command.is_none());
        assert!(config.lyrics_dir.ends_with("LyricsX"));
        assert_eq!(config.app_name(), "lyricstamp");
    }

    #[test]
    fn variables_override_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("LYRICS_DIR", "/tmp/lyrics"),
            ("PLAYER_APP", "Spotify"),
            ("CONTROL_TIMEOUT_MS", "750"),
            ("SEEK_ON_RETREAT", "no"),
            ("ANNOTATION_COMMAND", "romanize --stdin"),
        ]))
        .unwrap();
        assert_eq!(config.lyrics_dir, PathBuf::from("/tmp/lyrics"));
        assert_eq!(config.player_app, "Spotify");
        assert_eq!(config.session_options().control_timeout, Duration::from_millis(750));
        assert!(!config.session_options().seek_on_retreat);
        assert_eq!(config.annotation_command.as_deref(), Some("romanize --stdin"));
    }

    #[test]
    fn invalid_values_explain_the_fix() {
        let err = Config::from_lookup(lookup(&[("CONTROL_TIMEOUT_MS", "soon")])).unwrap_err();
        match err {
            Error::Config { hint, .. } => assert!(hint.contains("milliseconds")),
            other => panic!("Expected Config error, got {other:?}"),
        }
        assert!(Config::from_lookup(lookup(&[("SEEK_ON_RETREAT", "maybe")])).is_err());
        assert!(Config::from_lookup(lookup(&[("CONTROL_TIMEOUT_MS", "0")])).is_err());
    }
}
