//! The line-by-line alignment state machine.
//!
//! An [`AlignmentSession`] owns one [`LyricDocument`] and a cursor pointing at
//! the next line awaiting a timestamp. Front ends translate their input into
//! the four intents (advance, retreat, toggle pause, save) and render the
//! read-only view the session exposes.
//!
//! Playback position comes from a [`PlaybackControl`]. When the player does not
//! answer, the session falls back to its own clock: time since the first
//! advance minus the time spent paused.

pub mod phase;

pub use phase::SessionPhase;

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;

use crate::constants::player::DEFAULT_CONTROL_TIMEOUT_MS;
use crate::error::{Error, Result};
use crate::lyrics::{LrcxCodec, LyricDocument, LyricLine};
use crate::player::{bounded, PlaybackControl};
use crate::sources::Sink;
use crate::types::Timestamp;

/// Where a session is in its alignment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing recorded yet.
    NotStarted,
    /// Some lines recorded.
    InProgress,
    /// Every line recorded.
    Complete,
}

impl SessionState {
    /// Lowercase name for messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Complete => "complete",
        }
    }
}

/// Where a recorded timestamp came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSource {
    /// The fixed `00:00.000` start marker.
    Start,
    /// The player's reported position.
    Player,
    /// The session's own elapsed-time clock.
    Fallback,
}

/// Tunables for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Limit for each player call.
    pub control_timeout: Duration,
    /// Seek the player back to the previous line's timestamp on retreat.
    pub seek_on_retreat: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            control_timeout: Duration::from_millis(DEFAULT_CONTROL_TIMEOUT_MS),
            seek_on_retreat: true,
        }
    }
}

/// Outcome of a successful advance.
#[derive(Debug)]
pub struct Advanced {
    /// Lines that received the timestamp (one, or a line and its annotation).
    pub lines: Range<usize>,
    /// The recorded timestamp.
    pub timestamp: Timestamp,
    /// Where the timestamp came from.
    pub clock: ClockSource,
    /// A player failure that was recovered from.
    pub warning: Option<Error>,
}

/// Outcome of a successful retreat.
#[derive(Debug)]
pub struct Retreated {
    /// Lines whose timestamps were cleared.
    pub lines: Range<usize>,
    /// Position the player was moved to, if a seek was issued and succeeded.
    pub seeked_to: Option<Timestamp>,
    /// A player failure that was recovered from.
    pub warning: Option<Error>,
}

/// Outcome of a pause toggle.
#[derive(Debug)]
pub struct PauseToggled {
    /// Whether the session now considers playback paused.
    pub paused: bool,
    /// A player failure that was recovered from.
    pub warning: Option<Error>,
}

/// Outcome of a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    /// Full path the sink wrote.
    pub path: PathBuf,
    /// Serialized text that was written.
    pub text: String,
}

/// One alignment pass over a lyric document.
#[derive(Debug, Clone)]
pub struct AlignmentSession {
    document: LyricDocument,
    cursor: usize,
    /// Width of each advance not yet undone, so retreat mirrors it exactly.
    steps: Vec<usize>,
    recording_started_at: Option<Instant>,
    accumulated_pause: Duration,
    paused_at: Option<Instant>,
    options: SessionOptions,
}

impl AlignmentSession {
    /// Start a fresh pass over `document`.
    pub fn new(document: LyricDocument, options: SessionOptions) -> Self {
        Self {
            document,
            cursor: 0,
            steps: Vec::new(),
            recording_started_at: None,
            accumulated_pause: Duration::ZERO,
            paused_at: None,
            options,
        }
    }

    /// Continue a pass over a partially stamped document, e.g. one parsed from disk.
    ///
    /// The cursor starts at the first line without a timestamp. There is no clock
    /// baseline, so advancing needs the player until the session is restarted.
    pub fn resume(document: LyricDocument, options: SessionOptions) -> Self {
        let cursor = document.first_unstamped();
        Self {
            cursor,
            ..Self::new(document, options)
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        if self.cursor >= self.document.len() {
            SessionState::Complete
        } else if self.cursor == 0 {
            SessionState::NotStarted
        } else {
            SessionState::InProgress
        }
    }

    /// Index of the next line awaiting a timestamp.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of lines in the document.
    pub fn len(&self) -> usize {
        self.document.len()
    }

    /// Whether the document is empty.
    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    /// The document being aligned.
    pub const fn document(&self) -> &LyricDocument {
        &self.document
    }

    /// Session options.
    pub const fn options(&self) -> SessionOptions {
        self.options
    }

    /// Whether playback is considered paused.
    pub const fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Lines within `radius` of the cursor, with their indices.
    pub fn window(&self, radius: usize) -> impl Iterator<Item = (usize, &LyricLine)> {
        let start = self.cursor.saturating_sub(radius);
        let end = self.cursor.saturating_add(radius).saturating_add(1).min(self.document.len());
        self.document
            .lines()
            .iter()
            .enumerate()
            .skip(start)
            .take(end.saturating_sub(start))
    }

    /// Elapsed playback according to the session's own clock, if recording has started.
    pub fn elapsed(&self) -> Option<Duration> {
        let started = self.recording_started_at?;
        let now = Instant::now();
        let ongoing_pause = self.paused_at.map_or(Duration::ZERO, |at| now.saturating_duration_since(at));
        Some(
            now.saturating_duration_since(started)
                .saturating_sub(self.accumulated_pause)
                .saturating_sub(ongoing_pause),
        )
    }

    fn invalid(&self, intent: &'static str) -> Error {
        Error::InvalidIntent {
            intent,
            state: self.state().name(),
        }
    }

    fn reset_clock(&mut self, origin: Option<Instant>) {
        self.recording_started_at = origin;
        self.accumulated_pause = Duration::ZERO;
        self.paused_at = None;
    }

    /// Record a timestamp on the line at the cursor and move past it.
    ///
    /// From the first line the timestamp is always `00:00.000` and the player is
    /// asked to start the track. Otherwise the player's position is recorded,
    /// falling back to the session clock when the player does not answer. When the
    /// next line is an annotation it receives the same timestamp and the cursor
    /// moves by two.
    pub async fn advance(&mut self, player: &dyn PlaybackControl) -> Result<Advanced> {
        let len = self.document.len();
        if self.cursor >= len {
            return Err(self.invalid("advance"));
        }

        let mut warning = None;
        let (timestamp, clock) = if self.cursor == 0 {
            if let Err(e) = bounded(self.options.control_timeout, "start", player.start()).await {
                tracing::warn!("Player did not start playback: {e}");
                warning = Some(e);
            }
            self.reset_clock(Some(Instant::now()));
            (Timestamp::ZERO, ClockSource::Start)
        } else {
            match bounded(self.options.control_timeout, "position", player.position()).await {
                Ok(position) => (Timestamp::from_duration(position), ClockSource::Player),
                Err(e) => {
                    let Some(elapsed) = self.elapsed() else {
                        tracing::warn!("No position for line {}: {e}", self.cursor);
                        return Err(Error::NoPositionSource);
                    };
                    tracing::warn!("Using session clock for line {}: {e}", self.cursor);
                    warning = Some(e);
                    (Timestamp::from_duration(elapsed), ClockSource::Fallback)
                }
            }
        };

        let first = self.cursor;
        self.document.stamp(first, timestamp)?;
        let width = if first + 1 < len && self.document.is_annotation(first + 1) {
            self.document.stamp(first + 1, timestamp)?;
            2
        } else {
            1
        };
        self.cursor += width;
        self.steps.push(width);

        tracing::debug!("Stamped lines {first}..{} at {timestamp} ({clock:?})", self.cursor);
        Ok(Advanced {
            lines: first..self.cursor,
            timestamp,
            clock,
            warning,
        })
    }

    /// Width of the advance that produced the line before the cursor, for resumed
    /// sessions that have no step history.
    fn inferred_width(&self) -> usize {
        let last = self.cursor - 1;
        let paired = last >= 1
            && self.document.is_annotation(last)
            && self
                .document
                .line_at(last - 1)
                .is_ok_and(|primary| primary.timestamp() == self.document.lines()[last].timestamp());
        if paired {
            2
        } else {
            1
        }
    }

    /// Undo the most recent advance, clearing its timestamps.
    ///
    /// When enabled, the player is then moved to the timestamp of the line before
    /// the new cursor so that line can be re-recorded from the right spot.
    pub async fn retreat(&mut self, player: &dyn PlaybackControl) -> Result<Retreated> {
        if self.cursor == 0 {
            return Err(self.invalid("retreat"));
        }

        let width = self
            .steps
            .pop()
            .unwrap_or_else(|| self.inferred_width())
            .min(self.cursor);
        let to = self.cursor - width;
        for index in to..self.cursor {
            self.document.clear(index)?;
        }
        let lines = to..self.cursor;
        self.cursor = to;

        if to == 0 {
            self.reset_clock(None);
        }

        let mut seeked_to = None;
        let mut warning = None;
        let target = to
            .checked_sub(1)
            .and_then(|prev| self.document.lines().get(prev))
            .and_then(LyricLine::timestamp)
            .filter(|_| self.options.seek_on_retreat);
        if let Some(target) = target {
            match bounded(self.options.control_timeout, "seek", player.seek(target.as_duration())).await {
                Ok(()) => {
                    seeked_to = Some(target);
                    if self.recording_started_at.is_some() {
                        let now = Instant::now();
                        let paused = self.paused_at.is_some();
                        self.reset_clock(now.checked_sub(target.as_duration()).or(Some(now)));
                        if paused {
                            self.paused_at = Some(now);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Seek to {target} failed: {e}");
                    warning = Some(e);
                }
            }
        }

        tracing::debug!("Cleared lines {lines:?}");
        Ok(Retreated {
            lines,
            seeked_to,
            warning,
        })
    }

    /// Toggle playback and account the paused interval in the session clock.
    pub async fn toggle_pause(&mut self, player: &dyn PlaybackControl) -> Result<PauseToggled> {
        if self.cursor == 0 {
            return Err(self.invalid("toggle pause"));
        }

        let warning = bounded(self.options.control_timeout, "pause_play_toggle", player.pause_play_toggle())
            .await
            .err();
        if let Some(e) = &warning {
            tracing::warn!("Player did not toggle playback: {e}");
        }

        let now = Instant::now();
        if let Some(at) = self.paused_at.take() {
            self.accumulated_pause += now.saturating_duration_since(at);
        } else {
            self.paused_at = Some(now);
        }

        Ok(PauseToggled {
            paused: self.is_paused(),
            warning,
        })
    }

    /// Write the document as it stands, stamped or not, so the pass can be resumed
    /// later with [`AlignmentSession::resume`].
    pub fn save_progress(&self, sink: &dyn Sink, file_name: &Path) -> Result<Saved> {
        let text = LrcxCodec::serialize(&self.document);
        let path = sink.write(file_name, &text)?;
        tracing::info!("Saved progress at line {} of {}", self.cursor, self.len());
        Ok(Saved { path, text })
    }

    /// Serialize the completed document and hand it to `sink` under `file_name`.
    ///
    /// Can be repeated; a failed write leaves the session untouched.
    pub fn save(&self, sink: &dyn Sink, file_name: &Path) -> Result<Saved> {
        if self.state() != SessionState::Complete {
            return Err(self.invalid("save"));
        }
        let text = LrcxCodec::serialize(&self.document);
        let path = sink.write(file_name, &text)?;
        Ok(Saved { path, text })
    }
}
