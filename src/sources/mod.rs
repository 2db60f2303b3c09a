//! Collaborators that feed lyric text into a session and persist the result.
//!
//! Line sources supply the primary lyric lines, annotation sources supply one
//! ready-made companion line (e.g. a transliteration) per lyric line, and sinks
//! store the serialized `.lrcx` text.

pub mod clipboard;
pub mod command;
pub mod file;
pub mod memory;

pub use clipboard::ClipboardLineSource;
pub use command::CommandAnnotationSource;
pub use file::{FileAnnotationSource, FileLineSource, FileSink};
pub use memory::{MemorySink, TextLineSource};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};

/// Supplies the ordered lyric lines for a new document.
pub trait LineSource: Send + Sync {
    /// Fetch the lines. Fails with [`Error::SourceUnavailable`] when none can be obtained.
    fn fetch(&self) -> Result<Vec<String>>;

    /// Menu label for this source.
    fn describe(&self) -> String;
}

/// Generates one annotation per lyric line.
#[async_trait]
pub trait AnnotationSource: Send + Sync {
    /// Produce annotations aligned 1:1 with `lines`.
    async fn generate(&self, lines: &[String]) -> Result<Vec<String>>;

    /// Menu label for this source.
    fn describe(&self) -> String;
}

/// Destination for saved lyric files.
pub trait Sink: Send + Sync {
    /// Write `text` under `file_name`, returning the full path written.
    /// Fails with [`Error::WriteFailure`].
    fn write(&self, file_name: &Path, text: &str) -> Result<PathBuf>;
}

impl<T: Sink + ?Sized> Sink for Arc<T> {
    fn write(&self, file_name: &Path, text: &str) -> Result<PathBuf> {
        (**self).write(file_name, text)
    }
}

/// Split raw lyric text into trimmed, non-blank lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Reject an empty line list with a source error naming `origin`.
pub(crate) fn non_empty(lines: Vec<String>, origin: &str) -> Result<Vec<String>> {
    if lines.is_empty() {
        Err(Error::source_unavailable(format!("{origin} contains no lyric text")))
    } else {
        Ok(lines)
    }
}

/// Check that an annotation source produced exactly one line per lyric line.
pub(crate) fn check_aligned(annotations: Vec<String>, expected: usize, origin: &str) -> Result<Vec<String>> {
    if annotations.len() == expected {
        Ok(annotations)
    } else {
        Err(Error::source_unavailable(format!(
            "{origin} produced {} annotations for {expected} lines",
            annotations.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn split_lines_trims_and_drops_blanks() {
        let lines = split_lines("  Verse one \r\n\n\t\nVerse two\n");
        assert_eq!(lines, ["Verse one", "Verse two"]);
    }

    #[test]
    fn empty_sources_are_unavailable() {
        assert!(matches!(non_empty(Vec::new(), "clipboard"), Err(Error::SourceUnavailable(_))));
        assert!(check_aligned(vec!["x".into()], 2, "file").is_err());
        assert_eq!(check_aligned(vec!["x".into()], 1, "file").unwrap(), ["x"]);
    }
}
