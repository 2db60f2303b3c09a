//! Lyric documents and the `.lrcx` timestamped lyric format.
//!
//! A [`LyricDocument`] is the ordered list of lines being aligned; the
//! [`LrcxCodec`] turns it into the on-disk text form and back.

pub mod document;
pub mod lrcx;

pub use document::{LineKind, LyricDocument, LyricLine};
pub use lrcx::{LrcxCodec, LrcxEntry, ParsedLrcx};
