//! Terminal application state.
//!
//! `App` owns the collaborators (player, sink, sources) and the current
//! [`SessionPhase`], and turns intents from the input layer into session calls.

use crossterm::event::KeyEvent;
use ratatui::widgets::ListState;
use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::input::{self, AppMode, InputContext, InputResult, Intent};
use crate::lyrics::{LrcxCodec, LyricDocument};
use crate::player::{bounded, PlaybackControl};
use crate::session::{AlignmentSession, ClockSource, SessionPhase};
use crate::sources::{AnnotationSource, LineSource, Sink};
use crate::types::SongInfo;

/// Collaborators the application is wired to.
pub struct Collaborators {
    /// Player queried for positions and commanded on start/seek/pause.
    pub player: Box<dyn PlaybackControl>,
    /// Destination for saved lyrics.
    pub sink: Box<dyn Sink>,
    /// Lyric sources offered in the first menu.
    pub line_sources: Vec<Box<dyn LineSource>>,
    /// Annotation sources offered in the second menu, after "no annotations".
    pub annotation_sources: Vec<Box<dyn AnnotationSource>>,
}

/// Application state for the terminal front end.
pub struct App {
    /// Current phase.
    pub phase: SessionPhase,
    /// Loaded configuration.
    pub config: Config,
    /// Selection in the source and annotation menus.
    pub menu_state: ListState,
    /// Track the current document was built for.
    pub song: Option<SongInfo>,
    /// Transient informational message.
    pub status_message: Option<String>,
    /// Error shown until the next key press.
    pub error_message: Option<String>,
    /// Whether the key help overlay is shown.
    pub show_help: bool,
    file_name: Option<String>,
    should_quit: bool,
    collaborators: Collaborators,
}

impl App {
    /// Create the application in the source menu.
    pub fn new(config: Config, collaborators: Collaborators) -> Self {
        let mut menu_state = ListState::default();
        menu_state.select(Some(0));
        Self {
            phase: SessionPhase::default(),
            config,
            menu_state,
            song: None,
            status_message: None,
            error_message: None,
            show_help: false,
            file_name: None,
            should_quit: false,
            collaborators,
        }
    }

    /// Whether the event loop should stop.
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Current mode, derived from the phase.
    pub fn mode(&self) -> AppMode {
        AppMode::from(&self.phase)
    }

    /// Name the current lyrics are saved under, once a session exists.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Continue an interrupted pass from a `.lrcx` file written with "save progress".
    ///
    /// Later saves reuse the file's name.
    pub fn resume_from(&mut self, path: &Path) -> Result<()> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::source_unavailable(format!("{} is not a file", path.display())))?;
        let parsed = LrcxCodec::parse(&fs_err::read_to_string(path)?);
        for problem in &parsed.malformed {
            tracing::warn!("{}: {problem}", path.display());
        }
        let document = parsed.into_document();
        if document.is_empty() {
            return Err(Error::source_unavailable(format!("{} contains no lyric lines", path.display())));
        }

        let session = AlignmentSession::resume(document, self.config.session_options());
        tracing::info!("Resuming {} at line {} of {}", path.display(), session.cursor(), session.len());
        self.status_message = Some(format!("Resumed at line {} of {}", session.cursor() + 1, session.len()));
        self.phase = SessionPhase::Aligning(session);
        self.song = None;
        self.file_name = Some(file_name);
        Ok(())
    }

    /// Labels for the menu of the current phase.
    pub fn menu_items(&self) -> Vec<String> {
        match self.phase {
            SessionPhase::ChoosingSource => self
                .collaborators
                .line_sources
                .iter()
                .map(|s| s.describe())
                .collect(),
            SessionPhase::ChoosingAnnotation { .. } => std::iter::once("No annotations".to_string())
                .chain(self.collaborators.annotation_sources.iter().map(|s| s.describe()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Process one key press.
    pub async fn handle_key(&mut self, key: KeyEvent) {
        // Any key dismisses the previous message
        self.error_message = None;
        self.status_message = None;

        let ctx = InputContext {
            mode: self.mode(),
            show_help: self.show_help,
        };
        match input::dispatch(key, &ctx) {
            InputResult::Quit => self.should_quit = true,
            InputResult::ToggleHelp => self.show_help = !self.show_help,
            InputResult::Intent(intent) => {
                if let Err(e) = self.apply(intent).await {
                    tracing::warn!("{intent:?} failed: {e}");
                    self.error_message = Some(e.to_string());
                }
            }
            InputResult::Ignored => {}
        }
    }

    /// Apply an intent to the current phase.
    pub async fn apply(&mut self, intent: Intent) -> Result<()> {
        match intent {
            Intent::MenuUp | Intent::MenuDown => {
                self.move_selection(intent == Intent::MenuDown);
                Ok(())
            }
            Intent::Confirm => self.confirm().await,
            Intent::Back => {
                if matches!(self.phase, SessionPhase::ChoosingAnnotation { .. }) {
                    self.reset_to_sources();
                }
                Ok(())
            }
            Intent::Advance => self.advance().await,
            Intent::Retreat => self.retreat().await,
            Intent::TogglePause => self.toggle_pause().await,
            Intent::Save => self.save(),
            Intent::SaveProgress => self.save_progress(),
            Intent::SkipNext => self.skip_next().await,
            Intent::Restart => {
                self.reset_to_sources();
                Ok(())
            }
        }
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.menu_items().len();
        if len == 0 {
            return;
        }
        let current = self.menu_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1) % len
        } else {
            current.checked_sub(1).unwrap_or(len - 1)
        };
        self.menu_state.select(Some(next));
    }

    fn reset_to_sources(&mut self) {
        self.phase = SessionPhase::ChoosingSource;
        self.song = None;
        self.file_name = None;
        self.menu_state.select(Some(0));
    }

    async fn confirm(&mut self) -> Result<()> {
        let selected = self.menu_state.selected().unwrap_or(0);
        match std::mem::take(&mut self.phase) {
            SessionPhase::ChoosingSource => {
                let source = self
                    .collaborators
                    .line_sources
                    .get(selected)
                    .ok_or_else(|| Error::source_unavailable("no lyrics source configured"))?;
                let lines = source.fetch()?;
                tracing::info!("Fetched {} lines from {}", lines.len(), source.describe());
                self.phase = SessionPhase::ChoosingAnnotation { lines };
                self.menu_state.select(Some(0));
                Ok(())
            }
            SessionPhase::ChoosingAnnotation { lines } => {
                let result = self.start_session(&lines, selected).await;
                if result.is_err() {
                    self.phase = SessionPhase::ChoosingAnnotation { lines };
                }
                result
            }
            other => {
                self.phase = other;
                Ok(())
            }
        }
    }

    async fn start_session(&mut self, lines: &[String], selected: usize) -> Result<()> {
        let annotations = match selected.checked_sub(1) {
            None => None,
            Some(i) => {
                let source = self
                    .collaborators
                    .annotation_sources
                    .get(i)
                    .ok_or_else(|| Error::source_unavailable("no such annotation source"))?;
                Some(source.generate(lines).await?)
            }
        };

        let player = self.collaborators.player.as_ref();
        let song = match bounded(self.config.control_timeout, "now_playing", player.now_playing()).await {
            Ok(song) => song,
            Err(e) => {
                tracing::warn!("Could not read the current track: {e}");
                self.status_message = Some(format!("Unknown track ({e})"));
                SongInfo::default()
            }
        };

        let document = LyricDocument::build(lines, annotations.as_deref())?.with_header(&song);
        tracing::info!("Aligning {} lines for {}", document.len(), song.header());
        self.phase = SessionPhase::Aligning(AlignmentSession::new(document, self.config.session_options()));
        self.file_name = Some(song.file_name());
        self.song = Some(song);
        Ok(())
    }

    fn warn(&mut self, warning: Option<Error>) {
        if let Some(w) = warning {
            self.status_message = Some(format!("Warning: {w}"));
        }
    }

    async fn advance(&mut self) -> Result<()> {
        let player = self.collaborators.player.as_ref();
        let Some(session) = self.phase.aligning_mut() else {
            return Ok(());
        };
        let step = session.advance(player).await?;
        if step.clock == ClockSource::Fallback && step.warning.is_none() {
            self.status_message = Some("Timestamp taken from the session clock".to_string());
        }
        self.warn(step.warning);
        Ok(())
    }

    async fn retreat(&mut self) -> Result<()> {
        let player = self.collaborators.player.as_ref();
        let Some(session) = self.phase.aligning_mut() else {
            return Ok(());
        };
        let step = session.retreat(player).await?;
        self.warn(step.warning);
        Ok(())
    }

    async fn toggle_pause(&mut self) -> Result<()> {
        let player = self.collaborators.player.as_ref();
        let Some(session) = self.phase.aligning_mut() else {
            return Ok(());
        };
        let toggled = session.toggle_pause(player).await?;
        if toggled.warning.is_none() {
            self.status_message = Some(if toggled.paused { "Paused" } else { "Playing" }.to_string());
        }
        self.warn(toggled.warning);
        Ok(())
    }

    fn save_file_name(&self) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| SongInfo::default().file_name())
    }

    fn save_progress(&mut self) -> Result<()> {
        let file_name = self.save_file_name();
        let sink = self.collaborators.sink.as_ref();
        let Some(session) = self.phase.session() else {
            return Ok(());
        };
        let saved = session.save_progress(sink, Path::new(&file_name))?;
        self.status_message = Some(format!("Progress saved to {}", saved.path.display()));
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        let file_name = self.save_file_name();
        let sink = self.collaborators.sink.as_ref();
        let saved = match &self.phase {
            SessionPhase::Aligning(session) | SessionPhase::Saved { session, .. } => {
                session.save(sink, Path::new(&file_name))?
            }
            _ => return Ok(()),
        };

        self.phase = match std::mem::take(&mut self.phase) {
            SessionPhase::Aligning(session) | SessionPhase::Saved { session, .. } => SessionPhase::Saved {
                session,
                path: saved.path.clone(),
            },
            other => other,
        };
        self.status_message = Some(format!("Saved {}", saved.path.display()));
        Ok(())
    }

    async fn skip_next(&mut self) -> Result<()> {
        let player = self.collaborators.player.as_ref();
        bounded(self.config.control_timeout, "skip_next", player.skip_next()).await?;
        self.reset_to_sources();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::player::ScriptedPlayer;
    use crate::sources::{MemorySink, TextLineSource};
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::Arc;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn app(lyrics: &str) -> (App, Arc<ScriptedPlayer>, Arc<MemorySink>) {
        let player = Arc::new(ScriptedPlayer::new().with_song(SongInfo::new("My Song", "Artist")));
        let sink = Arc::new(MemorySink::new());
        let app = App::new(
            Config::default(),
            Collaborators {
                player: Box::new(Arc::clone(&player)),
                sink: Box::new(Arc::clone(&sink)),
                line_sources: vec![Box::new(TextLineSource::new("Inline", lyrics))],
                annotation_sources: Vec::new(),
            },
        );
        (app, player, sink)
    }

    #[tokio::test]
    async fn keys_drive_a_full_pass_to_saved() {
        let (mut app, player, sink) = app("Hello there\nGoodbye");
        player.push_position(Duration::from_millis(2500));
        player.push_position(Duration::from_millis(5000));

        app.handle_key(key(KeyCode::Enter)).await;
        assert_eq!(app.mode(), AppMode::ChoosingAnnotation);
        assert_eq!(app.menu_items(), ["No annotations"]);
        app.handle_key(key(KeyCode::Enter)).await;
        assert_eq!(app.mode(), AppMode::Aligning);

        for _ in 0..3 {
            app.handle_key(key(KeyCode::Down)).await;
        }
        app.handle_key(key(KeyCode::Char('s'))).await;

        assert_eq!(app.mode(), AppMode::Saved);
        let writes = sink.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, Path::new("My Song - Artist.lrcx"));
        assert_eq!(
            writes[0].1,
            "[00:00.000]My Song - Artist\n[00:02.500]Hello there\n[00:05.000]Goodbye\n"
        );
    }

    #[tokio::test]
    async fn early_save_shows_error_and_keeps_aligning() {
        let (mut app, _player, sink) = app("only line");
        app.handle_key(key(KeyCode::Enter)).await;
        app.handle_key(key(KeyCode::Enter)).await;
        app.handle_key(key(KeyCode::Char('s'))).await;

        assert_eq!(app.mode(), AppMode::Aligning);
        assert!(app.error_message.is_some());
        assert!(sink.writes().is_empty());
    }

    #[tokio::test]
    async fn unknown_track_still_starts_session() {
        let (mut app, player, _sink) = app("la");
        player.set_unavailable(true);
        app.handle_key(key(KeyCode::Enter)).await;
        app.handle_key(key(KeyCode::Enter)).await;

        assert_eq!(app.mode(), AppMode::Aligning);
        assert_eq!(app.song, Some(SongInfo::default()));
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn skip_next_returns_to_source_menu() {
        let (mut app, player, _sink) = app("la");
        app.handle_key(key(KeyCode::Enter)).await;
        app.handle_key(key(KeyCode::Enter)).await;
        app.handle_key(key(KeyCode::Down)).await;
        app.handle_key(key(KeyCode::Down)).await;
        app.handle_key(key(KeyCode::Char('s'))).await;
        app.handle_key(key(KeyCode::Char('n'))).await;

        assert_eq!(app.mode(), AppMode::ChoosingSource);
        assert!(app.song.is_none());
        assert!(player.calls().contains(&crate::player::PlayerCall::SkipNext));
    }

    #[tokio::test]
    async fn failed_skip_keeps_saved_screen() {
        let (mut app, player, _sink) = app("la");
        app.handle_key(key(KeyCode::Enter)).await;
        app.handle_key(key(KeyCode::Enter)).await;
        app.handle_key(key(KeyCode::Down)).await;
        app.handle_key(key(KeyCode::Down)).await;
        app.handle_key(key(KeyCode::Char('s'))).await;

        player.set_unavailable(true);
        app.handle_key(key(KeyCode::Char('n'))).await;

        assert_eq!(app.mode(), AppMode::Saved);
        assert!(app.error_message.is_some());
        assert_eq!(app.file_name(), Some("My Song - Artist.lrcx"));
    }

    #[tokio::test]
    async fn progress_file_resumes_where_it_stopped() {
        let (mut first, player, sink) = app("Hello there\nGoodbye");
        player.push_position(Duration::from_millis(2500));
        first.handle_key(key(KeyCode::Enter)).await;
        first.handle_key(key(KeyCode::Enter)).await;
        first.handle_key(key(KeyCode::Down)).await;
        first.handle_key(key(KeyCode::Down)).await;
        first.handle_key(key(KeyCode::Char('w'))).await;

        let writes = sink.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(
            writes[0].1,
            "[00:00.000]My Song - Artist\n[00:02.500]Hello there\nGoodbye\n"
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("My Song - Artist.lrcx");
        fs_err::write(&path, &writes[0].1).unwrap();

        let (mut resumed, player, sink) = app("unused");
        resumed.resume_from(&path).unwrap();
        assert_eq!(resumed.mode(), AppMode::Aligning);
        assert_eq!(resumed.phase.session().unwrap().cursor(), 2);

        player.push_position(Duration::from_millis(5000));
        resumed.handle_key(key(KeyCode::Down)).await;
        resumed.handle_key(key(KeyCode::Char('s'))).await;

        assert_eq!(resumed.mode(), AppMode::Saved);
        let writes = sink.writes();
        assert_eq!(writes[0].0, Path::new("My Song - Artist.lrcx"));
        assert_eq!(
            writes[0].1,
            "[00:00.000]My Song - Artist\n[00:02.500]Hello there\n[00:05.000]Goodbye\n"
        );
    }

    #[test]
    fn resume_from_missing_file_fails() {
        let (mut app, _player, _sink) = app("la");
        assert!(app.resume_from(Path::new("/definitely/not/here.lrcx")).is_err());
        assert_eq!(app.mode(), AppMode::ChoosingSource);
    }

    #[tokio::test]
    async fn quit_key_stops_the_loop() {
        let (mut app, _player, _sink) = app("la");
        app.handle_key(key(KeyCode::Char('q'))).await;
        assert!(app.should_quit());
    }
}
