//! `.lrcx` serialization and parsing.
//!
//! Each physical line is either bare text or a `[MM:SS.mmm]` timestamp followed
//! immediately by text. Annotation lines are ordinary lines whose text starts
//! with the annotation marker; the codec does not interpret it.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::Error;
use crate::lyrics::document::LyricDocument;
use crate::types::Timestamp;

/// Regex matching a well-formed leading timestamp. Single-digit minutes are accepted on read.
#[allow(clippy::expect_used)]
static RE_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d+):(\d{2})\.(\d{3})\]").expect("valid regex: RE_TIMESTAMP")
});

/// Regex matching anything that looks like a leading timestamp attempt.
#[allow(clippy::expect_used)]
static RE_TIMESTAMP_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\d+:\d+(?:[.:]\d+)?\]").expect("valid regex: RE_TIMESTAMP_LIKE")
});

/// Split a leading well-formed timestamp off `line`, returning it and the remaining text.
pub fn split_timestamp(line: &str) -> Option<(Timestamp, &str)> {
    let caps = RE_TIMESTAMP.captures(line)?;
    let whole = caps.get(0)?;
    let minutes = caps.get(1)?.as_str().parse().ok()?;
    let seconds = caps.get(2)?.as_str().parse().ok()?;
    let millis = caps.get(3)?.as_str().parse().ok()?;
    let ts = Timestamp::from_parts(minutes, seconds, millis)?;
    Some((ts, &line[whole.end()..]))
}

/// One parsed lyric unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LrcxEntry {
    /// Timestamp, when the line carried one.
    pub timestamp: Option<Timestamp>,
    /// Line text after the timestamp.
    pub text: String,
}

impl LrcxEntry {
    /// Create an entry.
    pub fn new(timestamp: Option<Timestamp>, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
        }
    }
}

/// Result of parsing `.lrcx` text.
#[derive(Debug, Default)]
pub struct ParsedLrcx {
    /// Recovered entries in file order.
    pub entries: Vec<LrcxEntry>,
    /// Lines whose leading bracket looks like a broken timestamp, as
    /// [`Error::MalformedLine`] values. They are still present in `entries` as bare text.
    pub malformed: Vec<Error>,
}

impl ParsedLrcx {
    /// Timestamps in entry order.
    pub fn timestamps(&self) -> Vec<Option<Timestamp>> {
        self.entries.iter().map(|e| e.timestamp).collect()
    }

    /// Texts in entry order.
    pub fn texts(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.text.as_str()).collect()
    }

    /// Rebuild a document from the recovered entries.
    pub fn into_document(self) -> LyricDocument {
        LyricDocument::from_entries(self.entries)
    }
}

/// Reads and writes the `.lrcx` line format.
#[derive(Debug, Default, Clone, Copy)]
pub struct LrcxCodec;

impl LrcxCodec {
    /// Render every line as `timestamp + text + "\n"`, omitting absent timestamps.
    pub fn serialize(document: &LyricDocument) -> String {
        let mut out = String::new();
        for line in document.lines() {
            if let Some(ts) = line.timestamp() {
                let _ = write!(out, "{ts}");
            }
            out.push_str(line.text());
            out.push('\n');
        }
        out
    }

    /// Parse `.lrcx` text. Blank lines are skipped. A line whose leading bracket only
    /// looks like a timestamp is kept as bare text and also reported in
    /// [`ParsedLrcx::malformed`].
    pub fn parse(text: &str) -> ParsedLrcx {
        let mut parsed = ParsedLrcx::default();

        for (i, raw) in text.lines().enumerate() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            if line.trim().is_empty() {
                continue;
            }

            if let Some((ts, rest)) = split_timestamp(line) {
                parsed.entries.push(LrcxEntry::new(Some(ts), rest));
            } else {
                if RE_TIMESTAMP_LIKE.is_match(line) {
                    tracing::warn!("Reading lrcx line {} as bare text: {line:?}", i + 1);
                    parsed.malformed.push(Error::MalformedLine {
                        line_number: i + 1,
                        content: line.to_string(),
                    });
                }
                parsed.entries.push(LrcxEntry::new(None, line));
            }
        }

        parsed
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn stamped_document() -> LyricDocument {
        let mut doc = LyricDocument::build(
            &["My Song - Artist", "Hello there", "Goodbye"],
            Some(&["", "Hello there", ""][..]),
        )
        .unwrap();
        doc.stamp(0, Timestamp::ZERO).unwrap();
        doc.stamp(1, Timestamp::from_millis(2500)).unwrap();
        doc.stamp(2, Timestamp::from_millis(2500)).unwrap();
        doc.stamp(3, Timestamp::from_millis(5000)).unwrap();
        doc
    }

    #[test]
    fn serialize_matches_saved_layout() {
        let text = LrcxCodec::serialize(&stamped_document());
        assert_eq!(
            text,
            "[00:00.000]My Song - Artist\n\
             [00:02.500]Hello there\n\
             [00:02.500][tr]Hello there\n\
             [00:05.000]Goodbye\n"
        );
    }

    #[test]
    fn unstamped_lines_serialize_bare() {
        let doc = LyricDocument::build::<_, &str>(&["Header", "verse"], None).unwrap();
        assert_eq!(LrcxCodec::serialize(&doc), "Header\nverse\n");
    }

    #[test]
    fn parse_inverts_serialize() {
        let mut doc = stamped_document();
        doc.clear(3).unwrap();
        let parsed = LrcxCodec::parse(&LrcxCodec::serialize(&doc));
        assert!(parsed.malformed.is_empty());
        assert_eq!(parsed.entries, doc.entries());
        assert_eq!(parsed.into_document(), doc);
    }

    #[test]
    fn parse_skips_blank_lines() {
        let parsed = LrcxCodec::parse("[00:00.000]Title\n\n   \n[00:03.100]line\r\n");
        assert_eq!(parsed.texts(), ["Title", "line"]);
        assert_eq!(
            parsed.timestamps(),
            [Some(Timestamp::ZERO), Some(Timestamp::from_millis(3100))]
        );
        assert!(parsed.malformed.is_empty());
    }

    #[test]
    fn parse_reports_malformed_timestamps_and_continues() {
        let parsed = LrcxCodec::parse("[00:01.000]ok\n[00:75.000]bad seconds\n[1:2.3]short\nplain\n");
        assert_eq!(parsed.texts(), ["ok", "[00:75.000]bad seconds", "[1:2.3]short", "plain"]);
        assert_eq!(parsed.timestamps(), [Some(Timestamp::from_millis(1000)), None, None, None]);
        assert_eq!(parsed.malformed.len(), 2);
        match &parsed.malformed[0] {
            Error::MalformedLine { line_number: 2, .. } => {}
            other => panic!("Expected MalformedLine at 2, got {other:?}"),
        }
    }

    #[test]
    fn timestamp_lookalike_text_survives_round_trip() {
        let mut doc = LyricDocument::build::<_, &str>(&["[1:2] intro", "[00:75.000] odd", "verse"], None).unwrap();
        doc.stamp(2, Timestamp::from_millis(4200)).unwrap();

        let parsed = LrcxCodec::parse(&LrcxCodec::serialize(&doc));
        assert_eq!(parsed.entries, doc.entries());
        assert_eq!(parsed.malformed.len(), 2);
        assert_eq!(parsed.into_document(), doc);
    }

    #[test]
    fn parse_accepts_single_digit_minutes() {
        let parsed = LrcxCodec::parse("[0:02.500]legacy");
        assert_eq!(parsed.entries, [LrcxEntry::new(Some(Timestamp::from_millis(2500)), "legacy")]);
    }

    #[test]
    fn annotation_marker_is_opaque_text() {
        let parsed = LrcxCodec::parse("[tr]romaji only\n");
        assert_eq!(parsed.entries, [LrcxEntry::new(None, "[tr]romaji only")]);
        let doc = parsed.into_document();
        assert!(doc.is_annotation(0));
    }

    #[test]
    fn empty_text_after_timestamp_is_kept() {
        let parsed = LrcxCodec::parse("[00:10.000]\n");
        assert_eq!(parsed.entries, [LrcxEntry::new(Some(Timestamp::from_millis(10_000)), "")]);
    }
}
