//! Front-end phases around an alignment pass.

use std::path::PathBuf;

use crate::session::AlignmentSession;

/// What the front end is currently doing.
#[derive(Debug, Default)]
pub enum SessionPhase {
    /// Picking where the lyric lines come from.
    #[default]
    ChoosingSource,
    /// Lines fetched; picking whether and how to annotate them.
    ChoosingAnnotation {
        /// The fetched lyric lines.
        lines: Vec<String>,
    },
    /// Stepping through the document.
    Aligning(AlignmentSession),
    /// The completed document was written.
    Saved {
        /// The completed session, kept so it can be saved again.
        session: AlignmentSession,
        /// Where it was written.
        path: PathBuf,
    },
}

impl SessionPhase {
    /// Short label for the title bar.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ChoosingSource => "Choose lyrics",
            Self::ChoosingAnnotation { .. } => "Choose annotations",
            Self::Aligning(_) => "Aligning",
            Self::Saved { .. } => "Saved",
        }
    }

    /// The session being aligned or already saved.
    pub const fn session(&self) -> Option<&AlignmentSession> {
        match self {
            Self::Aligning(session) | Self::Saved { session, .. } => Some(session),
            _ => None,
        }
    }

    /// Mutable access to the session while aligning.
    pub fn aligning_mut(&mut self) -> Option<&mut AlignmentSession> {
        match self {
            Self::Aligning(session) => Some(session),
            _ => None,
        }
    }
}
