//! Input handling abstractions.
//!
//! This module translates keyboard input into session intents, one handler per
//! phase, so key bindings can be tested without a terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::SessionPhase;

/// Something the user asked the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Stamp the line at the cursor and move on.
    Advance,
    /// Undo the last stamp.
    Retreat,
    /// Pause or resume playback.
    TogglePause,
    /// Write the completed lyrics.
    Save,
    /// Write the lyrics as stamped so far, to resume later.
    SaveProgress,
    /// Skip to the next track and start over.
    SkipNext,
    /// Start over with the same track.
    Restart,
    /// Move the menu selection up.
    MenuUp,
    /// Move the menu selection down.
    MenuDown,
    /// Accept the menu selection.
    Confirm,
    /// Go back to the previous menu.
    Back,
}

/// Result of processing an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
    /// The key maps to an intent.
    Intent(Intent),
    /// The input was ignored (not applicable to this handler).
    Ignored,
    /// The application should quit.
    Quit,
    /// Show or hide the key help.
    ToggleHelp,
}

/// Application modes, the tag of [`SessionPhase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Picking a lyrics source.
    ChoosingSource,
    /// Picking an annotation source.
    ChoosingAnnotation,
    /// Stepping through lines.
    Aligning,
    /// Lyrics written.
    Saved,
}

impl From<&SessionPhase> for AppMode {
    fn from(phase: &SessionPhase) -> Self {
        match phase {
            SessionPhase::ChoosingSource => Self::ChoosingSource,
            SessionPhase::ChoosingAnnotation { .. } => Self::ChoosingAnnotation,
            SessionPhase::Aligning(_) => Self::Aligning,
            SessionPhase::Saved { .. } => Self::Saved,
        }
    }
}

/// Context passed to input handlers.
pub struct InputContext {
    /// Current application mode.
    pub mode: AppMode,
    /// Whether help is currently shown.
    pub show_help: bool,
}

/// Trait for handling keyboard input.
///
/// Implementations of this trait handle input for specific modes
/// or input contexts.
pub trait InputHandler {
    /// Handle a key event.
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext) -> InputResult;

    /// Get the name of this handler (for debugging).
    fn name(&self) -> &'static str;
}

/// Handler for global shortcuts (help, quit).
#[derive(Debug, Default)]
pub struct GlobalHandler;

impl InputHandler for GlobalHandler {
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext) -> InputResult {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return InputResult::Quit;
        }

        match key.code {
            KeyCode::F(1) | KeyCode::Char('?') => InputResult::ToggleHelp,
            KeyCode::Esc if ctx.show_help => InputResult::ToggleHelp,
            KeyCode::Char('q') => InputResult::Quit,
            _ => InputResult::Ignored,
        }
    }

    fn name(&self) -> &'static str {
        "GlobalHandler"
    }
}

/// Handler for the source and annotation menus.
#[derive(Debug, Default)]
pub struct MenuHandler;

impl InputHandler for MenuHandler {
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext) -> InputResult {
        let intent = match key.code {
            KeyCode::Up | KeyCode::Char('k') => Intent::MenuUp,
            KeyCode::Down | KeyCode::Char('j') => Intent::MenuDown,
            KeyCode::Enter => Intent::Confirm,
            KeyCode::Esc | KeyCode::Backspace if ctx.mode == AppMode::ChoosingAnnotation => Intent::Back,
            _ => return InputResult::Ignored,
        };
        InputResult::Intent(intent)
    }

    fn name(&self) -> &'static str {
        "MenuHandler"
    }
}

/// Handler while stepping through lines.
#[derive(Debug, Default)]
pub struct AlignHandler;

impl InputHandler for AlignHandler {
    fn handle(&mut self, key: KeyEvent, _ctx: &InputContext) -> InputResult {
        let intent = match key.code {
            KeyCode::Down | KeyCode::Enter | KeyCode::Char(' ' | 'j') => Intent::Advance,
            KeyCode::Up | KeyCode::Backspace | KeyCode::Char('k') => Intent::Retreat,
            KeyCode::Char('p') => Intent::TogglePause,
            KeyCode::Char('s' | 'e') => Intent::Save,
            KeyCode::Char('w') => Intent::SaveProgress,
            _ => return InputResult::Ignored,
        };
        InputResult::Intent(intent)
    }

    fn name(&self) -> &'static str {
        "AlignHandler"
    }
}

/// Handler after the lyrics were written.
#[derive(Debug, Default)]
pub struct SavedHandler;

impl InputHandler for SavedHandler {
    fn handle(&mut self, key: KeyEvent, _ctx: &InputContext) -> InputResult {
        let intent = match key.code {
            KeyCode::Char('n') => Intent::SkipNext,
            KeyCode::Char('r') | KeyCode::Enter => Intent::Restart,
            KeyCode::Char('s') => Intent::Save,
            _ => return InputResult::Ignored,
        };
        InputResult::Intent(intent)
    }

    fn name(&self) -> &'static str {
        "SavedHandler"
    }
}

/// Route a key through the global handler, then the handler for the current mode.
pub fn dispatch(key: KeyEvent, ctx: &InputContext) -> InputResult {
    match GlobalHandler.handle(key, ctx) {
        InputResult::Ignored => {}
        other => return other,
    }
    if ctx.show_help {
        return InputResult::Ignored;
    }

    let mut handler: Box<dyn InputHandler> = match ctx.mode {
        AppMode::ChoosingSource | AppMode::ChoosingAnnotation => Box::new(MenuHandler),
        AppMode::Aligning => Box::new(AlignHandler),
        AppMode::Saved => Box::new(SavedHandler),
    };
    let result = handler.handle(key, ctx);
    tracing::trace!("{} mapped {:?} to {result:?}", handler.name(), key.code);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn make_context(mode: AppMode) -> InputContext {
        InputContext {
            mode,
            show_help: false,
        }
    }

    #[test]
    fn test_align_keys_map_to_intents() {
        let ctx = make_context(AppMode::Aligning);
        assert_eq!(dispatch(make_key(KeyCode::Down), &ctx), InputResult::Intent(Intent::Advance));
        assert_eq!(dispatch(make_key(KeyCode::Char(' ')), &ctx), InputResult::Intent(Intent::Advance));
        assert_eq!(dispatch(make_key(KeyCode::Up), &ctx), InputResult::Intent(Intent::Retreat));
        assert_eq!(dispatch(make_key(KeyCode::Char('p')), &ctx), InputResult::Intent(Intent::TogglePause));
        assert_eq!(dispatch(make_key(KeyCode::Char('e')), &ctx), InputResult::Intent(Intent::Save));
        assert_eq!(dispatch(make_key(KeyCode::Char('w')), &ctx), InputResult::Intent(Intent::SaveProgress));
    }

    #[test]
    fn test_global_quit_and_help() {
        let ctx = make_context(AppMode::ChoosingSource);
        assert_eq!(dispatch(make_key(KeyCode::Char('q')), &ctx), InputResult::Quit);
        assert_eq!(dispatch(make_key(KeyCode::F(1)), &ctx), InputResult::ToggleHelp);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(dispatch(ctrl_c, &make_context(AppMode::Aligning)), InputResult::Quit);
    }

    #[test]
    fn test_help_swallows_mode_keys() {
        let ctx = InputContext {
            mode: AppMode::Aligning,
            show_help: true,
        };
        assert_eq!(dispatch(make_key(KeyCode::Down), &ctx), InputResult::Ignored);
        assert_eq!(dispatch(make_key(KeyCode::Esc), &ctx), InputResult::ToggleHelp);
    }

    #[test]
    fn test_back_only_from_annotation_menu() {
        let source = make_context(AppMode::ChoosingSource);
        assert_eq!(dispatch(make_key(KeyCode::Esc), &source), InputResult::Ignored);

        let annotation = make_context(AppMode::ChoosingAnnotation);
        assert_eq!(dispatch(make_key(KeyCode::Esc), &annotation), InputResult::Intent(Intent::Back));
        assert_eq!(dispatch(make_key(KeyCode::Enter), &annotation), InputResult::Intent(Intent::Confirm));
    }

    #[test]
    fn test_saved_handler_keys() {
        let mut handler = SavedHandler;
        let ctx = make_context(AppMode::Saved);
        assert_eq!(handler.handle(make_key(KeyCode::Char('n')), &ctx), InputResult::Intent(Intent::SkipNext));
        assert_eq!(handler.handle(make_key(KeyCode::Down), &ctx), InputResult::Ignored);
    }
}
