//! `osascript` bridge to a scriptable macOS media player.

use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::player::PlaybackControl;
use crate::types::SongInfo;

/// Controls a player application (Apple Music by default) through AppleScript.
#[derive(Debug, Clone)]
pub struct AppleScriptPlayer {
    app: String,
}

impl AppleScriptPlayer {
    /// Create a bridge targeting the named application.
    pub fn new(app: impl Into<String>) -> Self {
        Self { app: app.into() }
    }

    /// Full script for a `tell application` block.
    fn script(&self, body: &str) -> String {
        format!("tell application \"{}\"\n{body}\nend tell", self.app.replace('"', ""))
    }

    async fn run(&self, operation: &'static str, body: &str) -> Result<String> {
        let output = Command::new("osascript")
            .arg("-e")
            .arg(self.script(body))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::control(operation, format!("failed to run osascript: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::control(
                operation,
                format!("osascript exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for AppleScriptPlayer {
    fn default() -> Self {
        Self::new(crate::constants::player::DEFAULT_PLAYER_APP)
    }
}

/// Parse a player position such as `12.345` or, in comma locales, `12,345`.
fn parse_position(raw: &str) -> Option<Duration> {
    let secs: f64 = raw.trim().replace(',', ".").parse().ok()?;
    (secs.is_finite() && secs >= 0.0).then(|| Duration::from_secs_f64(secs))
}

#[async_trait]
impl PlaybackControl for AppleScriptPlayer {
    async fn position(&self) -> Result<Duration> {
        let raw = self.run("position", "get player position").await?;
        parse_position(&raw)
            .ok_or_else(|| Error::control("position", format!("unreadable position {raw:?}")))
    }

    async fn seek(&self, position: Duration) -> Result<()> {
        let body = format!("set player position to {:.3}", position.as_secs_f64());
        self.run("seek", &body).await.map(drop)
    }

    async fn start(&self) -> Result<()> {
        // `back track` rewinds the current track; there is no stable id to replay it by.
        self.run("start", "back track\nplay").await.map(drop)
    }

    async fn pause_play_toggle(&self) -> Result<()> {
        self.run("pause_play_toggle", "playpause").await.map(drop)
    }

    async fn skip_next(&self) -> Result<()> {
        self.run("skip_next", "next track\nplay").await.map(drop)
    }

    async fn now_playing(&self) -> Result<SongInfo> {
        let title = self.run("now_playing", "get name of current track").await?;
        let artist = self.run("now_playing", "get artist of current track").await?;
        Ok(SongInfo::new(title, artist))
    }

    fn name(&self) -> &'static str {
        "applescript"
    }
}
