//! Home menu and recently saved entities

use super::components::{render_menu_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::state::HomeAction;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Shortcut shown on each menu button
fn shortcut(action: HomeAction) -> &'static str {
    match action {
        HomeAction::NewClass => "c",
        HomeAction::NewStudent => "n",
        HomeAction::BrowseStudents => "s",
    }
}

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(40), Constraint::Min(0)])
        .split(area);

    draw_menu(frame, h_chunks[0], app);
    draw_recent(frame, h_chunks[1], app);
}

fn draw_menu(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Admin ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(1)];
    for _ in HomeAction::ALL {
        constraints.push(Constraint::Length(BUTTON_HEIGHT));
        constraints.push(Constraint::Length(1)); // Hint
    }
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (idx, action) in HomeAction::ALL.iter().enumerate() {
        let is_selected = idx == app.state.selected_index;
        render_menu_button(
            frame,
            chunks[1 + idx * 2],
            shortcut(*action),
            action.label(),
            is_selected,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("  {}", action.hint()),
                Style::default().fg(Color::DarkGray),
            )),
            chunks[2 + idx * 2],
        );
    }
}

fn draw_recent(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Saved this session ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if app.state.recent.is_empty() {
        let content = Paragraph::new(
            "Nothing saved yet.\nPress 'c' to schedule a class or 'n' to add a student.",
        )
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
        frame.render_widget(content, area);
        return;
    }

    let lines: Vec<Line> = app
        .state
        .recent
        .iter()
        .map(|notice| {
            let verb = if notice.kind.is_edit() {
                "updated"
            } else {
                "created"
            };
            Line::from(vec![
                Span::styled(" ✓ ", Style::default().fg(Color::Green)),
                Span::styled(
                    notice.kind.entity(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" \"{}\" {verb} ", notice.label)),
                Span::styled(
                    format!("({})", notice.entity_id),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
