//! Alignment view: the lines around the cursor with their timestamps.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::app::App;
use crate::constants::ui::WINDOW_RADIUS;
use crate::lyrics::LyricLine;
use crate::session::{AlignmentSession, SessionPhase, SessionState};
use crate::types::Timestamp;
use crate::ui::create_titled_block;

const UNSTAMPED: &str = "[--:--.---]";

/// Draw the session window, with a progress gauge and the save location once saved.
pub fn draw_aligner(f: &mut Frame, app: &App, area: Rect) {
    let Some(session) = app.phase.session() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    draw_progress(f, app, session, chunks[0]);

    let title = app
        .song
        .as_ref()
        .map(crate::types::SongInfo::header)
        .or_else(|| app.file_name().map(str::to_string))
        .unwrap_or_else(|| "Lyrics".to_string());
    let block = create_titled_block(&title, true);
    let inner = block.inner(chunks[1]);
    f.render_widget(block, chunks[1]);

    let width = usize::from(inner.width);
    let lines: Vec<Line> = session
        .window(WINDOW_RADIUS)
        .map(|(i, line)| render_line(line, i == session.cursor(), width))
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_progress(f: &mut Frame, app: &App, session: &AlignmentSession, area: Rect) {
    let total = session.len().max(1);
    let done = session.cursor().min(total);

    let state = match (&app.phase, session.state()) {
        (SessionPhase::Saved { path, .. }, _) => format!("Saved to {}", path.display()),
        (_, SessionState::NotStarted) => "Press Space when the first line starts".to_string(),
        (_, SessionState::Complete) => "Complete, press s to save".to_string(),
        (_, SessionState::InProgress) if session.is_paused() => "Paused".to_string(),
        (_, SessionState::InProgress) => "Recording".to_string(),
    };
    let clock = session
        .elapsed()
        .map_or_else(|| UNSTAMPED.to_string(), |e| Timestamp::from_duration(e).to_string());

    let color = if session.is_paused() { Color::Yellow } else { Color::Green };
    #[allow(clippy::cast_precision_loss)]
    let ratio = done as f64 / total as f64;
    let gauge = Gauge::default()
        .block(create_titled_block("Progress", false))
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{done}/{total} {clock} {state}"));
    f.render_widget(gauge, area);
}

fn render_line(line: &LyricLine, is_cursor: bool, width: usize) -> Line<'static> {
    let stamp = line
        .timestamp()
        .map_or_else(|| UNSTAMPED.to_string(), |t| t.to_string());
    let marker = if is_cursor { "▶ " } else { "  " };
    let indent = if line.is_annotation() { "    " } else { "" };

    let mut text_style = if line.is_annotation() {
        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC)
    } else {
        Style::default().fg(Color::White)
    };
    if is_cursor {
        text_style = text_style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
    }
    let stamp_style = if line.timestamp().is_some() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let used = marker.chars().count() + stamp.len() + 1 + indent.len();
    let text = truncate(line.display_text(), width.saturating_sub(used));

    Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::styled(stamp, stamp_style),
        Span::raw(" "),
        Span::raw(indent),
        Span::styled(text, text_style),
    ])
}

/// Cut `text` to at most `max` terminal columns, ending with `…` when shortened.
fn truncate(text: &str, max: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max {
        return text.to_string();
    }
    let budget = max.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    if max > 0 {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn long_text_is_cut_by_columns() {
        assert_eq!(truncate("hello world", 6), "hello…");
        // Wide characters take two columns each
        assert_eq!(truncate("日本語の歌詞", 5), "日本…");
        assert_eq!(truncate("anything", 0), "");
    }
}
