//! Application error types.
//!
//! Provides unified error handling with actionable context for debugging.

use thiserror::Error;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// No lyric lines could be obtained from a line or annotation source.
    #[error("Lyrics source unavailable: {0}")]
    SourceUnavailable(String),

    /// A player query or command failed or timed out.
    #[error("Player control unavailable during {operation}: {message}")]
    ControlUnavailable {
        /// The player operation that was attempted (e.g. `position`).
        operation: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// The player could not report a position and no internal clock baseline exists.
    #[error("No playback position available: the player did not answer and recording has no start time")]
    NoPositionSource,

    /// A line index outside the document was requested.
    #[error("Line index {index} out of range for document of {len} lines")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The document length.
        len: usize,
    },

    /// A `.lrcx` line carried a timestamp-like prefix that is not well formed.
    #[error("Malformed line {line_number}: {content:?}")]
    MalformedLine {
        /// One-based physical line number in the parsed text.
        line_number: usize,
        /// The offending line.
        content: String,
    },

    /// The sink rejected a save.
    #[error("Failed to write {path:?}: {message}")]
    WriteFailure {
        /// Destination that was written.
        path: std::path::PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// An intent was issued in a session state that does not accept it.
    #[error("Cannot {intent} while session is {state}")]
    InvalidIntent {
        /// The rejected intent.
        intent: &'static str,
        /// The session state at the time.
        state: &'static str,
    },

    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<std::path::PathBuf>,
    },

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// Generic message error (escape hatch)
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a player control error for the named operation
    pub fn control(operation: &'static str, message: impl Into<String>) -> Self {
        Self::ControlUnavailable {
            operation,
            message: message.into(),
        }
    }

    /// Create a source error
    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self::SourceUnavailable(message.into())
    }

    /// Create a write failure for the given destination
    pub fn write_failure(path: impl Into<std::path::PathBuf>, message: impl Into<String>) -> Self {
        Self::WriteFailure {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Whether the session can continue after this error.
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::IndexOutOfRange { .. } | Self::SourceUnavailable(_))
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Msg(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Msg(s.to_string())
    }
}
