//! Deterministic player used to drive sessions without a live media player.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::player::PlaybackControl;
use crate::types::SongInfo;

/// A call received by [`ScriptedPlayer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCall {
    /// `position()` was queried.
    Position,
    /// `seek()` was requested with this position.
    Seek(Duration),
    /// `start()` was requested.
    Start,
    /// `pause_play_toggle()` was requested.
    PausePlayToggle,
    /// `skip_next()` was requested.
    SkipNext,
    /// `now_playing()` was queried.
    NowPlaying,
}

#[derive(Debug, Default)]
struct Script {
    positions: VecDeque<Option<Duration>>,
    calls: Vec<PlayerCall>,
    song: Option<SongInfo>,
    unavailable: bool,
    latency: Duration,
}

/// Player double that answers position queries from a queue and records every call.
///
/// A queued `None` or an empty queue makes `position()` fail. Marking the player
/// unavailable makes every call fail.
#[derive(Debug, Default)]
pub struct ScriptedPlayer {
    script: Mutex<Script>,
}

impl ScriptedPlayer {
    /// Create a player with no queued positions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report this song from `now_playing()`.
    #[must_use]
    pub fn with_song(self, song: SongInfo) -> Self {
        self.lock().song = Some(song);
        self
    }

    /// Queue a successful position answer.
    pub fn push_position(&self, position: Duration) {
        self.lock().positions.push_back(Some(position));
    }

    /// Queue a failed position answer.
    pub fn push_failure(&self) {
        self.lock().positions.push_back(None);
    }

    /// Make every call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Delay every answer, to exercise call timeouts.
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = latency;
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<PlayerCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call and return the configured latency, or fail when unavailable.
    fn record(&self, call: PlayerCall, operation: &'static str) -> Result<Duration> {
        let mut script = self.lock();
        script.calls.push(call);
        if script.unavailable {
            return Err(Error::control(operation, "scripted player unavailable"));
        }
        Ok(script.latency)
    }

    async fn answer(&self, call: PlayerCall, operation: &'static str) -> Result<()> {
        let latency = self.record(call, operation)?;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        Ok(())
    }
}

#[async_trait]
impl PlaybackControl for ScriptedPlayer {
    async fn position(&self) -> Result<Duration> {
        self.answer(PlayerCall::Position, "position").await?;
        self.lock()
            .positions
            .pop_front()
            .flatten()
            .ok_or_else(|| Error::control("position", "no scripted position"))
    }

    async fn seek(&self, position: Duration) -> Result<()> {
        self.answer(PlayerCall::Seek(position), "seek").await
    }

    async fn start(&self) -> Result<()> {
        self.answer(PlayerCall::Start, "start").await
    }

    async fn pause_play_toggle(&self) -> Result<()> {
        self.answer(PlayerCall::PausePlayToggle, "pause_play_toggle").await
    }

    async fn skip_next(&self) -> Result<()> {
        self.answer(PlayerCall::SkipNext, "skip_next").await
    }

    async fn now_playing(&self) -> Result<SongInfo> {
        self.answer(PlayerCall::NowPlaying, "now_playing").await?;
        self.lock()
            .song
            .clone()
            .ok_or_else(|| Error::control("now_playing", "no scripted song"))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[tokio::test]
    async fn positions_are_answered_in_order() {
        let player = ScriptedPlayer::new();
        player.push_position(Duration::from_secs(1));
        player.push_failure();

        assert_eq!(player.position().await.unwrap(), Duration::from_secs(1));
        assert!(player.position().await.is_err());
        assert!(player.position().await.is_err());
        assert_eq!(player.calls(), vec![PlayerCall::Position; 3]);
    }

    #[tokio::test]
    async fn unavailable_player_fails_every_call() {
        let player = ScriptedPlayer::new().with_song(SongInfo::new("t", "a"));
        player.set_unavailable(true);
        assert!(player.start().await.is_err());
        assert!(player.now_playing().await.is_err());

        player.set_unavailable(false);
        assert_eq!(player.now_playing().await.unwrap(), SongInfo::new("t", "a"));
        assert_eq!(
            player.calls(),
            [PlayerCall::Start, PlayerCall::NowPlaying, PlayerCall::NowPlaying]
        );
    }
}
