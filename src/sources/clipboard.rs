//! Lyrics pasted on the system clipboard.

use arboard::Clipboard;

use crate::error::{Error, Result};
use crate::sources::{non_empty, split_lines, LineSource};

/// Reads lyric lines from the clipboard text.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClipboardLineSource;

impl LineSource for ClipboardLineSource {
    fn fetch(&self) -> Result<Vec<String>> {
        let text = Clipboard::new()
            .and_then(|mut c| c.get_text())
            .map_err(|e| Error::source_unavailable(format!("clipboard: {e}")))?;
        non_empty(split_lines(&text), "clipboard")
    }

    fn describe(&self) -> String {
        "Paste from clipboard".to_string()
    }
}
