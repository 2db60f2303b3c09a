//! In-memory sources and sinks.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::{Error, Result};
use crate::sources::{non_empty, split_lines, LineSource, Sink};

/// Lyric lines supplied directly as text.
#[derive(Debug, Clone)]
pub struct TextLineSource {
    label: String,
    text: String,
}

impl TextLineSource {
    /// Create a source from raw lyric text.
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

impl LineSource for TextLineSource {
    fn fetch(&self) -> Result<Vec<String>> {
        non_empty(split_lines(&self.text), &self.label)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// Sink that keeps every write in memory, optionally rejecting them.
#[derive(Debug, Default)]
pub struct MemorySink {
    writes: Mutex<Vec<(PathBuf, String)>>,
    reject: bool,
}

impl MemorySink {
    /// Create an accepting sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that fails every write.
    pub fn rejecting() -> Self {
        Self {
            writes: Mutex::default(),
            reject: true,
        }
    }

    /// Writes accepted so far.
    pub fn writes(&self) -> Vec<(PathBuf, String)> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Sink for MemorySink {
    fn write(&self, file_name: &Path, text: &str) -> Result<PathBuf> {
        if self.reject {
            return Err(Error::write_failure(file_name, "memory sink rejects writes"));
        }
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((file_name.to_path_buf(), text.to_string()));
        Ok(file_name.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn text_source_splits_lines() {
        let source = TextLineSource::new("inline", "a\n\nb");
        assert_eq!(source.fetch().unwrap(), ["a", "b"]);
        assert!(TextLineSource::new("inline", " \n").fetch().is_err());
    }

    #[test]
    fn rejecting_sink_records_nothing() {
        let sink = MemorySink::rejecting();
        let err = sink.write(Path::new("x.lrcx"), "text").unwrap_err();
        assert!(matches!(err, Error::WriteFailure { .. }));
        assert!(sink.writes().is_empty());
    }
}
