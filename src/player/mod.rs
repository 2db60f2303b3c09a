//! Media player control.
//!
//! The alignment session only talks to the player through [`PlaybackControl`],
//! so the state machine can be driven by the real AppleScript bridge or by the
//! deterministic [`ScriptedPlayer`] in tests.

pub mod applescript;
pub mod scripted;

pub use applescript::AppleScriptPlayer;
pub use scripted::{PlayerCall, ScriptedPlayer};

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::SongInfo;

/// Capability interface for querying and commanding a media player.
///
/// Every method may fail with [`Error::ControlUnavailable`].
#[async_trait]
pub trait PlaybackControl: Send + Sync {
    /// Current elapsed playback position of the current track.
    async fn position(&self) -> Result<Duration>;

    /// Move playback to `position`.
    async fn seek(&self, position: Duration) -> Result<()>;

    /// Start the current track from its beginning.
    async fn start(&self) -> Result<()>;

    /// Toggle between playing and paused.
    async fn pause_play_toggle(&self) -> Result<()>;

    /// Skip to the next track and play it.
    async fn skip_next(&self) -> Result<()>;

    /// Title and artist of the current track.
    async fn now_playing(&self) -> Result<SongInfo>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<T: PlaybackControl + ?Sized> PlaybackControl for Arc<T> {
    async fn position(&self) -> Result<Duration> {
        (**self).position().await
    }

    async fn seek(&self, position: Duration) -> Result<()> {
        (**self).seek(position).await
    }

    async fn start(&self) -> Result<()> {
        (**self).start().await
    }

    async fn pause_play_toggle(&self) -> Result<()> {
        (**self).pause_play_toggle().await
    }

    async fn skip_next(&self) -> Result<()> {
        (**self).skip_next().await
    }

    async fn now_playing(&self) -> Result<SongInfo> {
        (**self).now_playing().await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Run a player call with a time limit, treating a timeout as a control failure.
pub async fn bounded<T>(
    limit: Duration,
    operation: &'static str,
    call: impl Future<Output = Result<T>> + Send,
) -> Result<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(Error::control(
            operation,
            format!("no answer within {}ms", limit.as_millis()),
        )),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn bounded_turns_timeout_into_control_error() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(Duration::ZERO)
        };
        let err = bounded(Duration::from_millis(500), "position", slow).await.unwrap_err();
        match err {
            Error::ControlUnavailable { operation: "position", message } => {
                assert!(message.contains("500ms"));
            }
            other => panic!("Expected ControlUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn bounded_passes_through_results() {
        let value = bounded(Duration::from_secs(1), "start", async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }
}
