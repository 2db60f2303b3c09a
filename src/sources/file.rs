//! Plain-text files on disk.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::sources::{check_aligned, non_empty, split_lines, AnnotationSource, LineSource, Sink};

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let text = fs_err::read_to_string(path).map_err(|e| Error::source_unavailable(e.to_string()))?;
    non_empty(split_lines(&text), &path.display().to_string())
}

/// Reads lyric lines from a text file, one lyric line per file line.
#[derive(Debug, Clone)]
pub struct FileLineSource {
    path: PathBuf,
}

impl FileLineSource {
    /// Create a source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LineSource for FileLineSource {
    fn fetch(&self) -> Result<Vec<String>> {
        let lines = read_lines(&self.path)?;
        tracing::info!("Read {} lyric lines from {}", lines.len(), self.path.display());
        Ok(lines)
    }

    fn describe(&self) -> String {
        format!("File: {}", self.path.display())
    }
}

/// Reads pre-generated annotations from a companion text file.
///
/// Blank lines are ignored the same way they are for lyric files, so the
/// remaining lines must pair 1:1 with the lyric lines.
#[derive(Debug, Clone)]
pub struct FileAnnotationSource {
    path: PathBuf,
}

impl FileAnnotationSource {
    /// Create a source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AnnotationSource for FileAnnotationSource {
    async fn generate(&self, lines: &[String]) -> Result<Vec<String>> {
        let annotations = read_lines(&self.path)?;
        check_aligned(annotations, lines.len(), &self.path.display().to_string())
    }

    fn describe(&self) -> String {
        format!("Annotations file: {}", self.path.display())
    }
}

/// Writes lyric files into a directory, creating it when missing.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Create a sink rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory files are written into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Sink for FileSink {
    fn write(&self, file_name: &Path, text: &str) -> Result<PathBuf> {
        let path = self.dir.join(file_name);
        fs_err::create_dir_all(&self.dir)
            .and_then(|()| fs_err::write(&path, text))
            .map_err(|e| Error::write_failure(&path, e.to_string()))?;
        tracing::info!("Saved {} bytes to {}", text.len(), path.display());
        Ok(path)
    }
}
