//! Layout components (content area, status bar)

use std::time::Instant;

use crate::app::App;
use crate::platform;
use crate::state::forms::{FieldKind, FocusSlot, WizardForm};
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Create the main layout: content on top, one status line below
pub fn create_layout(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    chunks[0]
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    // Data source
    if app.state.using_fixtures {
        spans.push(Span::styled(
            " FIXTURES ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::styled(" ● ", Style::default().fg(Color::Green)));
    }
    spans.push(Span::raw(" "));

    let hints = match app.wizard.as_ref() {
        Some(form) => wizard_hints(form),
        None => view_hints(app.state.current_view),
    };
    spans.push(Span::styled(hints, Style::default().fg(Color::Gray)));

    if let Some(message) = app.state.status(Instant::now()) {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(message, Style::default().fg(Color::Yellow)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: quit_hint.len() as u16,
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn view_hints(view: View) -> String {
    match view {
        View::Home => "j/k:nav  Enter:open  c:new class  n:new student  s:students  q:quit"
            .to_string(),
        View::Students => "j/k:nav  Enter/e:edit  n:new  r:reload  Esc:back".to_string(),
    }
}

/// Get keyboard hints for the focused part of the open wizard
fn wizard_hints(form: &WizardForm) -> String {
    let status = form.shell.status();
    if status.is_busy() {
        return "Submitting…".to_string();
    }
    if status.is_done() {
        return "Enter/Esc:close".to_string();
    }

    let nav = format!(
        "{}:{}  {}:back  Esc:cancel",
        platform::NEXT,
        if form.shell.is_terminal_step() {
            "submit"
        } else {
            "next"
        },
        platform::PREVIOUS,
    );

    let field = match (form.active_slot(), form.active_spec().map(|s| s.kind)) {
        (FocusSlot::Footer, _) => "←/→:button  Enter:press".to_string(),
        (FocusSlot::ListEntry { .. }, _) => format!(
            "Tab:next  {}:add  {}:remove",
            platform::ADD_ENTRY,
            platform::REMOVE_ENTRY
        ),
        (_, Some(FieldKind::Select(_))) => "Tab:next  ←/→:choose".to_string(),
        (_, Some(FieldKind::Flag)) => "Tab:next  Space:toggle".to_string(),
        (_, Some(FieldKind::Multiline)) => "Tab:next  Enter:newline".to_string(),
        _ => "Tab:next".to_string(),
    };

    format!("{field}  {nav}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::{CreateClassFlow, Form, WizardShell};
    use std::sync::Arc;
    use std::time::Duration;

    fn open_form() -> WizardForm {
        let mut shell = WizardShell::new(Arc::new(CreateClassFlow::new()), Duration::ZERO);
        shell.open();
        WizardForm::new(shell)
    }

    #[test]
    fn test_view_hints_name_the_shortcuts() {
        assert!(view_hints(View::Home).contains("c:new class"));
        assert!(view_hints(View::Students).contains("Esc:back"));
    }

    #[test]
    fn test_wizard_hints_follow_focus() {
        let mut form = open_form();
        let first = wizard_hints(&form);
        assert!(first.contains(platform::NEXT));
        assert!(first.contains(":next"));

        form.active_field_index = form.field_count() - 1;
        assert!(wizard_hints(&form).contains("Enter:press"));
    }
}
