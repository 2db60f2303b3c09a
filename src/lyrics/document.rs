//! Ordered lyric lines with optional recorded timestamps.

use serde::Serialize;

use crate::constants::lyrics::ANNOTATION_MARKER;
use crate::error::{Error, Result};
use crate::lyrics::lrcx::{split_timestamp, LrcxEntry};
use crate::types::{SongInfo, Timestamp};

/// Whether a line is ingested lyric text or a companion annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineKind {
    /// A directly ingested lyric line.
    Primary,
    /// A generated companion line (e.g. transliteration) attached to the line before it.
    Annotation,
}

impl LineKind {
    /// Classify text by its leading annotation marker.
    #[must_use]
    pub fn of(text: &str) -> Self {
        if text.starts_with(ANNOTATION_MARKER) {
            Self::Annotation
        } else {
            Self::Primary
        }
    }
}

/// One unit of lyric text and the timestamp recorded for it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LyricLine {
    text: String,
    kind: LineKind,
    timestamp: Option<Timestamp>,
}

impl LyricLine {
    fn new(text: String, timestamp: Option<Timestamp>) -> Self {
        Self {
            kind: LineKind::of(&text),
            text,
            timestamp,
        }
    }

    /// The line content, including the annotation marker for annotation lines.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Line content with any annotation marker removed, for display.
    pub fn display_text(&self) -> &str {
        self.text.strip_prefix(ANNOTATION_MARKER).unwrap_or(&self.text)
    }

    /// The line kind.
    pub const fn kind(&self) -> LineKind {
        self.kind
    }

    /// Whether this is an annotation line.
    pub fn is_annotation(&self) -> bool {
        self.kind == LineKind::Annotation
    }

    /// The recorded timestamp, if any.
    pub const fn timestamp(&self) -> Option<Timestamp> {
        self.timestamp
    }
}

/// Ordered, index-stable sequence of lyric lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LyricDocument {
    lines: Vec<LyricLine>,
}

impl LyricDocument {
    /// Build a document from ingested lines, interleaving annotations when supplied.
    ///
    /// Each annotation follows its line immediately, prefixed with the annotation
    /// marker. Blank lines are skipped together with their annotation, blank
    /// annotations are omitted, and any timestamp already present at the start of
    /// a line is dropped so the text is re-stamped from scratch.
    pub fn build<S: AsRef<str>, A: AsRef<str>>(lines: &[S], annotations: Option<&[A]>) -> Result<Self> {
        if let Some(annotations) = annotations {
            if annotations.len() != lines.len() {
                return Err(Error::source_unavailable(format!(
                    "{} annotations supplied for {} lines",
                    annotations.len(),
                    lines.len()
                )));
            }
        }

        let mut doc = Self::default();
        for (i, raw) in lines.iter().enumerate() {
            let text = ingest(raw.as_ref());
            if text.trim().is_empty() {
                continue;
            }
            doc.lines.push(LyricLine::new(text, None));

            let Some(annotation) = annotations.and_then(|a| a.get(i)) else {
                continue;
            };
            let annotation = ingest(annotation.as_ref());
            let annotation = annotation.trim();
            if !annotation.is_empty() {
                doc.lines
                    .push(LyricLine::new(format!("{ANNOTATION_MARKER}{annotation}"), None));
            }
        }
        Ok(doc)
    }

    /// Rebuild a document from parsed `.lrcx` entries, keeping recorded timestamps.
    pub fn from_entries(entries: impl IntoIterator<Item = LrcxEntry>) -> Self {
        Self {
            lines: entries
                .into_iter()
                .map(|e| LyricLine::new(e.text, e.timestamp))
                .collect(),
        }
    }

    /// Prepend the `<title> - <artist>` header line.
    #[must_use]
    pub fn with_header(mut self, song: &SongInfo) -> Self {
        self.lines.insert(0, LyricLine::new(ingest(&song.header()), None));
        self
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the document has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All lines in order.
    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    /// The line at `index`.
    pub fn line_at(&self, index: usize) -> Result<&LyricLine> {
        self.lines.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.lines.len(),
        })
    }

    /// Whether the line at `index` exists and is an annotation.
    pub fn is_annotation(&self, index: usize) -> bool {
        self.lines.get(index).is_some_and(LyricLine::is_annotation)
    }

    /// Index of the first line without a timestamp, or the length when all are stamped.
    pub fn first_unstamped(&self) -> usize {
        self.lines
            .iter()
            .position(|l| l.timestamp.is_none())
            .unwrap_or(self.lines.len())
    }

    /// The (timestamp, text) pairs in document order.
    pub fn entries(&self) -> Vec<LrcxEntry> {
        self.lines
            .iter()
            .map(|l| LrcxEntry {
                timestamp: l.timestamp,
                text: l.text.clone(),
            })
            .collect()
    }

    pub(crate) fn stamp(&mut self, index: usize, timestamp: Timestamp) -> Result<()> {
        let len = self.lines.len();
        let line = self
            .lines
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        line.timestamp = Some(timestamp);
        Ok(())
    }

    pub(crate) fn clear(&mut self, index: usize) -> Result<Option<Timestamp>> {
        let len = self.lines.len();
        let line = self
            .lines
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        Ok(line.timestamp.take())
    }
}

/// Normalize one ingested line: single physical line, no leading timestamp.
fn ingest(raw: &str) -> String {
    let mut text = raw.trim_end_matches(['\r', '\n']).replace(['\r', '\n'], " ");
    while let Some((_, rest)) = split_timestamp(&text) {
        text = rest.to_string();
    }
    text
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn build_without_annotations_keeps_order() {
        let doc = LyricDocument::build::<_, &str>(&["Song - Artist", "one", "two"], None).unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.line_at(2).unwrap().text(), "two");
        assert!(doc.lines().iter().all(|l| l.kind() == LineKind::Primary));
    }

    #[test]
    fn build_interleaves_annotations() {
        let lines = ["こんにちは", "さようなら"];
        let annotations = ["konnichiwa", "sayounara"];
        let doc = LyricDocument::build(&lines, Some(&annotations[..])).unwrap();

        let texts: Vec<&str> = doc.lines().iter().map(LyricLine::text).collect();
        assert_eq!(
            texts,
            ["こんにちは", "[tr]konnichiwa", "さようなら", "[tr]sayounara"]
        );
        assert!(!doc.is_annotation(0));
        assert!(doc.is_annotation(1));
        assert_eq!(doc.line_at(1).unwrap().display_text(), "konnichiwa");
    }

    #[test]
    fn build_rejects_misaligned_annotations() {
        let err = LyricDocument::build(&["a", "b"], Some(&["x"][..])).unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable(_)));
    }

    #[test]
    fn build_skips_blank_lines_and_old_timestamps() {
        let doc = LyricDocument::build(&["[00:01.000]first\r\n", "   ", "second"], Some(&["a", "b", ""][..]))
            .unwrap();
        let texts: Vec<&str> = doc.lines().iter().map(LyricLine::text).collect();
        assert_eq!(texts, ["first", "[tr]a", "second"]);
    }

    #[test]
    fn line_at_out_of_range() {
        let doc = LyricDocument::build::<_, &str>(&["only"], None).unwrap();
        match doc.line_at(1) {
            Err(Error::IndexOutOfRange { index: 1, len: 1 }) => {}
            other => panic!("Expected IndexOutOfRange, got {other:?}"),
        }
        assert!(!doc.is_annotation(5));
    }

    #[test]
    fn header_is_prepended_as_primary() {
        let doc = LyricDocument::build::<_, &str>(&["la la"], None)
            .unwrap()
            .with_header(&SongInfo::new("Title", "Artist"));
        assert_eq!(doc.line_at(0).unwrap().text(), "Title - Artist");
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn stamp_and_clear_track_first_unstamped() {
        let mut doc = LyricDocument::build::<_, &str>(&["a", "b"], None).unwrap();
        assert_eq!(doc.first_unstamped(), 0);
        doc.stamp(0, Timestamp::ZERO).unwrap();
        assert_eq!(doc.first_unstamped(), 1);
        doc.stamp(1, Timestamp::from_millis(10)).unwrap();
        assert_eq!(doc.first_unstamped(), 2);
        assert_eq!(doc.clear(1).unwrap(), Some(Timestamp::from_millis(10)));
        assert_eq!(doc.first_unstamped(), 1);
        assert!(doc.stamp(2, Timestamp::ZERO).is_err());
    }
}
