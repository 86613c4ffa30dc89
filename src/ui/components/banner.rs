//! Banner and overlay helpers

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::state::forms::{Banner, BannerKind};

/// Rectangle of at most `width` x `height` centered in `area`
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Rows a banner needs inside `width` columns, borders included
pub fn banner_height(banner: &Banner, width: u16) -> u16 {
    let inner = usize::from(width.saturating_sub(4)).max(1);
    banner_lines(banner, inner).len() as u16 + 2
}

/// Friendly wording, then the raw server text dimmed underneath
fn banner_lines(banner: &Banner, width: usize) -> Vec<Line<'static>> {
    let color = match banner.kind {
        BannerKind::Error => Color::Red,
        BannerKind::Success => Color::Green,
    };
    let mut lines: Vec<Line> = wrap_text(&banner.message, width)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(color))))
        .collect();
    if let Some(detail) = &banner.detail {
        lines.extend(
            wrap_text(&format!("Server said: {detail}"), width)
                .into_iter()
                .map(|l| Line::from(Span::styled(l, Style::default().fg(Color::DarkGray)))),
        );
    }
    lines
}

/// Render a submission banner with a dismiss hint
pub fn render_banner(frame: &mut Frame, area: Rect, banner: &Banner) {
    let (title, color) = match banner.kind {
        BannerKind::Error => (" Error ", Color::Red),
        BannerKind::Success => (" Saved ", Color::Green),
    };
    let inner = usize::from(area.width.saturating_sub(4)).max(1);
    let lines = banner_lines(banner, inner);

    let block = Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(if banner.kind == BannerKind::Error {
            Line::from(Span::styled(" Esc dismiss ", Style::default().fg(Color::DarkGray)))
        } else {
            Line::default()
        })
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Wrap text to fit within a maximum width
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        for word in paragraph.split_whitespace() {
            let needed = current_line.chars().count() + word.chars().count() + 1;
            if needed > max_width && !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
            }
            if !current_line.is_empty() {
                current_line.push(' ');
            }
            current_line.push_str(word);
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
