//! Student list

use crate::app::App;
use crate::state::ListState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{self, Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(format!(" Students ({}) ", app.state.students.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let message = match &app.state.students_state {
        ListState::NotLoaded | ListState::Loading => {
            Some(("Loading students…".to_string(), Color::DarkGray))
        }
        ListState::Failed(reason) => Some((
            format!("Could not load students: {reason}\nPress 'r' to retry."),
            Color::Red,
        )),
        ListState::Loaded if app.state.students.is_empty() => Some((
            "No students yet.\nPress 'n' to add one.".to_string(),
            Color::DarkGray,
        )),
        ListState::Loaded => None,
    };

    if let Some((text, color)) = message {
        frame.render_widget(
            Paragraph::new(text)
                .style(Style::default().fg(color))
                .block(block),
            area,
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Cyan)),
        Span::styled(" edit  ", Style::default().fg(Color::DarkGray)),
        Span::styled("n", Style::default().fg(Color::Cyan)),
        Span::styled(" new  ", Style::default().fg(Color::DarkGray)),
        Span::styled("r", Style::default().fg(Color::Cyan)),
        Span::styled(" reload", Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = app
        .state
        .students
        .iter()
        .enumerate()
        .map(|(idx, student)| {
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸ " } else { "  " };
            let style = if is_selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            let (marker, marker_color) = if student.details.is_active {
                ("●", Color::Green)
            } else {
                ("○", Color::DarkGray)
            };

            ListItem::new(Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(marker, Style::default().fg(marker_color)),
                Span::raw(" "),
                Span::styled(format!("{:<28}", student.display_name()), style),
                Span::styled(
                    format!("{:<32}", student.details.email),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("Grade {}", student.details.grade_level),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(block);
    let mut list_state =
        widgets::ListState::default().with_selected(Some(app.state.selected_index));
    frame.render_stateful_widget(list, chunks[1], &mut list_state);
}
