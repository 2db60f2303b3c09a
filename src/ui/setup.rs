use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

use crate::app::App;
use crate::session::SessionPhase;
use crate::ui::create_titled_block;

/// Draw the lyrics source menu, or the annotation menu next to a preview of the fetched lines.
pub fn draw_menu(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let title = match app.phase {
        SessionPhase::ChoosingAnnotation { .. } => "Annotations",
        _ => "Lyrics source",
    };

    let selected = app.menu_state.selected();
    let items: Vec<ListItem> = app
        .menu_items()
        .into_iter()
        .enumerate()
        .map(|(i, label)| {
            let (prefix, text_style) = if Some(i) == selected {
                ("> ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            } else {
                ("  ", Style::default().fg(Color::White))
            };
            ListItem::new(Line::from(vec![Span::raw(prefix), Span::styled(label, text_style)]))
        })
        .collect();

    let menu = List::new(items)
        .block(create_titled_block(title, true))
        .highlight_style(Style::default().bg(Color::Rgb(80, 80, 120)).add_modifier(Modifier::BOLD))
        .highlight_symbol("");

    // Preview of what was fetched, so the user can check it before starting
    let preview: Vec<ListItem> = match &app.phase {
        SessionPhase::ChoosingAnnotation { lines } => lines
            .iter()
            .map(|l| ListItem::new(Span::styled(l.as_str(), Style::default().fg(Color::Gray))))
            .collect(),
        _ => vec![ListItem::new(Span::styled(
            "Choose where the lyrics come from",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    let preview_title = match &app.phase {
        SessionPhase::ChoosingAnnotation { lines } => format!("Lyrics ({} lines)", lines.len()),
        _ => "Lyrics".to_string(),
    };
    let preview = List::new(preview).block(create_titled_block(&preview_title, false));

    f.render_widget(preview, chunks[1]);
    f.render_stateful_widget(menu, chunks[0], &mut app.menu_state);
}
