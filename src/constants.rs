//! Application constants.
//!
//! Centralizes magic numbers and configuration values for better maintainability.

/// Lyric format constants.
pub mod lyrics {
    /// Text prefix that marks a line as an annotation of the line before it.
    pub const ANNOTATION_MARKER: &str = "[tr]";

    /// File extension for saved timestamped lyrics.
    pub const LRCX_EXTENSION: &str = "lrcx";

    /// Characters stripped from song titles and artists when building file names.
    pub const UNSAFE_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

    /// Limit for an external annotation command, in seconds.
    pub const DEFAULT_ANNOTATION_TIMEOUT_SECS: u64 = 30;
}

/// Player control constants.
pub mod player {
    /// Default application targeted by the AppleScript backend.
    pub const DEFAULT_PLAYER_APP: &str = "Music";

    /// Default timeout for a single player query or command, in milliseconds.
    pub const DEFAULT_CONTROL_TIMEOUT_MS: u64 = 2000;
}

/// Filesystem constants.
pub mod paths {
    /// Lyrics directory relative to the home directory.
    pub const DEFAULT_LYRICS_SUBDIR: &str = "Music/LyricsX";

    /// Log file written inside the lyrics directory.
    pub const LOG_FILE_NAME: &str = "lyricstamp.log";
}

/// UI layout constants.
pub mod ui {
    /// Lines shown above and below the cursor in the alignment view.
    pub const WINDOW_RADIUS: usize = 6;

    /// Event poll interval for the terminal loop, in milliseconds.
    pub const POLL_INTERVAL_MS: u64 = 50;
}
