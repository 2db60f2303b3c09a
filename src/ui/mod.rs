//! User interface components.
//!
//! Provides TUI widgets and drawing functions for the application's
//! terminal-based user interface using ratatui.

mod aligner;
mod setup;

pub use aligner::draw_aligner;
pub use setup::draw_menu;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::input::AppMode;

/// Render the full application UI to the terminal frame.
pub fn draw(f: &mut Frame, app: &mut App) {
    // Create the base layout
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3), // Command/status bar at bottom
        ])
        .split(f.size());

    match app.mode() {
        AppMode::ChoosingSource | AppMode::ChoosingAnnotation => draw_menu(f, app, chunks[0]),
        AppMode::Aligning | AppMode::Saved => draw_aligner(f, app, chunks[0]),
    }

    draw_command_bar(f, app, chunks[1]);

    // Draw error message if present (blocking)
    if let Some(error) = &app.error_message {
        draw_error_message(f, error);
        return;
    }

    if app.show_help {
        draw_help_modal(f, app);
    }
}

fn draw_command_bar(f: &mut Frame, app: &App, area: Rect) {
    let title = format!("{} {}", app.config.app_name(), app.config.app_version());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(title, Style::default().fg(Color::Yellow)));

    f.render_widget(block, area);

    let inner_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1)])
        .margin(1) // Add a margin of 1 to account for the border
        .split(area)[0];

    let mut text = match app.mode() {
        AppMode::ChoosingSource => create_help_text(&[("↑/↓", "Select"), ("Enter", "Load lyrics"), ("q", "Quit")]),
        AppMode::ChoosingAnnotation => {
            create_help_text(&[("↑/↓", "Select"), ("Enter", "Start"), ("Esc", "Back"), ("q", "Quit")])
        }
        AppMode::Aligning => create_help_text(&[
            ("Space/↓", "Stamp"),
            ("↑", "Undo"),
            ("p", "Pause"),
            ("s", "Save"),
            ("w", "Save progress"),
            ("?", "Help"),
        ]),
        AppMode::Saved => create_help_text(&[("n", "Next track"), ("r", "Restart"), ("s", "Save again"), ("q", "Quit")]),
    };

    // Transient status goes after the hints
    if let Some(status) = &app.status_message {
        text.push(Span::styled(format!(" | {status}"), Style::default().fg(Color::Cyan)));
    }

    let status_bar = Paragraph::new(Line::from(text)).style(Style::default().fg(Color::Gray));
    f.render_widget(status_bar, inner_area);
}

/// Build styled help text spans from key-description pairs for the command bar.
pub fn create_help_text<'a>(commands: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut text = vec![Span::raw(" ")]; // Start with padding

    for (i, (key, description)) in commands.iter().enumerate() {
        text.push(Span::styled(*key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
        text.push(Span::raw(format!(": {description}")));

        if i + 1 < commands.len() {
            text.push(Span::raw(" | "));
        }
    }

    text
}

/// Create a bordered block with a title, highlighted when focused.
pub fn create_titled_block(title: &str, is_focused: bool) -> Block<'_> {
    let (title_style, border_style) = if is_focused {
        (
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Yellow),
        )
    } else {
        (Style::default(), Style::default())
    };

    Block::default()
        .title(Span::styled(title, title_style))
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// A centered rectangle of at most `width` x `height` inside `outer`.
fn centered(outer: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(outer.width.saturating_sub(4));
    let height = height.min(outer.height.saturating_sub(4));
    Rect {
        x: outer.x + (outer.width.saturating_sub(width)) / 2,
        y: outer.y + (outer.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

// Draw an error message overlay
fn draw_error_message(f: &mut Frame, message: &str) {
    let area = centered(f.size(), 50, 7);

    let block = Block::default()
        .title(Span::styled("Error", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black));

    let text = Paragraph::new(message)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, area); // Clear the area first
    f.render_widget(block, area);

    let inner_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .margin(1)
        .split(area);

    f.render_widget(text, inner_area[0]);

    let hint = Paragraph::new("Press any key to dismiss")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);

    f.render_widget(hint, inner_area[1]);
}

// Draw the help modal with keybindings
fn draw_help_modal(f: &mut Frame, app: &App) {
    let area = centered(f.size(), 56, 20);

    let block = Block::default()
        .title(Span::styled(" Help - Keybindings ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let inner_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1)])
        .margin(1)
        .split(area)[0];

    let help_text: Vec<Line> = build_help_content(app.mode())
        .iter()
        .map(|(key, desc, is_header)| {
            if *is_header {
                Line::from(Span::styled(*key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)))
            } else {
                Line::from(vec![
                    Span::styled(format!("{key:>12}"), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    Span::styled(*desc, Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    f.render_widget(Paragraph::new(help_text).wrap(Wrap { trim: true }), inner_area);
}

// Build help content based on current mode
fn build_help_content(mode: AppMode) -> Vec<(&'static str, &'static str, bool)> {
    let mut lines = vec![
        ("── Global ──", "", true),
        ("F1 / ?", "Show this help", false),
        ("q / Ctrl+C", "Quit application", false),
        ("", "", false),
    ];

    match mode {
        AppMode::ChoosingSource | AppMode::ChoosingAnnotation => {
            lines.extend([
                ("── Setup ──", "", true),
                ("↑/↓ or j/k", "Move selection", false),
                ("Enter", "Confirm", false),
                ("Esc", "Back to lyrics sources", false),
            ]);
        }
        AppMode::Aligning => {
            lines.extend([
                ("── Aligning ──", "", true),
                ("Space/↓/j", "Stamp the current line", false),
                ("Enter", "Stamp the current line", false),
                ("↑/k/Bksp", "Undo the last stamp", false),
                ("p", "Pause / resume playback", false),
                ("s / e", "Save when every line is stamped", false),
                ("w", "Save progress to resume later", false),
            ]);
        }
        AppMode::Saved => {
            lines.extend([
                ("── Saved ──", "", true),
                ("n", "Skip to the next track", false),
                ("r / Enter", "Start over", false),
                ("s", "Save again", false),
            ]);
        }
    }

    lines.push(("", "", false));
    lines.push(("Press Esc, F1 or ? to close", "", true));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_text_separates_commands() {
        let spans = create_help_text(&[("a", "one"), ("b", "two")]);
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, " a: one | b: two");
    }

    #[test]
    fn help_content_is_mode_specific() {
        let aligning = build_help_content(AppMode::Aligning);
        assert!(aligning.iter().any(|(k, _, _)| *k == "p"));
        let saved = build_help_content(AppMode::Saved);
        assert!(!saved.iter().any(|(k, _, _)| *k == "p"));
    }

    #[test]
    fn centered_rect_fits_inside() {
        let outer = Rect::new(0, 0, 40, 10);
        let inner = centered(outer, 100, 100);
        assert!(inner.width <= 36 && inner.height <= 6);
        assert_eq!(inner.x, 2);
    }
}
