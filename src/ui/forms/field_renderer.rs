//! Field rendering utilities for forms

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// What to draw for one input box
pub struct FieldView<'a> {
    pub label: &'a str,
    pub value: &'a str,
    /// Shown dimmed when the value is empty
    pub placeholder: &'a str,
    pub is_active: bool,
    pub is_multiline: bool,
    pub is_required: bool,
    pub has_error: bool,
    pub is_disabled: bool,
}

/// Rows a field box takes
pub fn field_height(is_multiline: bool) -> u16 {
    if is_multiline {
        5
    } else {
        3
    }
}

/// Draw one input box
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FieldView) {
    let accent = if field.has_error {
        Color::Red
    } else if field.is_active {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let style = if field.is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let cursor = if field.is_active { "▌" } else { "" };

    let content = if field.value.is_empty() && !field.is_active {
        Paragraph::new(Line::from(Span::styled(
            field.placeholder,
            Style::default().fg(Color::DarkGray),
        )))
    } else if field.is_multiline {
        let mut lines: Vec<Line> = field
            .value
            .split('\n')
            .map(|l| Line::from(Span::styled(l.to_string(), style)))
            .collect();
        if let Some(last) = lines.last_mut() {
            last.spans
                .push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
        }
        Paragraph::new(lines)
    } else {
        Paragraph::new(Line::from(vec![
            Span::styled(field.value, style),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ]))
    };

    let mut title = vec![Span::styled(
        format!(" {}", field.label),
        Style::default().fg(accent),
    )];
    if field.is_required {
        title.push(Span::styled(" *", Style::default().fg(Color::Red)));
    }
    title.push(Span::raw(" "));

    let mut border_style = Style::default().fg(accent);
    if field.is_disabled {
        border_style = border_style.add_modifier(Modifier::DIM);
    }

    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}

/// Draw the inline message under a field
pub fn draw_error(frame: &mut Frame, area: Rect, message: &str) {
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("  ⚠ {message}"),
            Style::default().fg(Color::Red),
        )),
        area,
    );
}
