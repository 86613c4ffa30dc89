//! Wizard overlay

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::components::{
    banner_height, centered_rect, render_banner, render_button, BUTTON_HEIGHT,
};
use super::forms::{draw_error, draw_field, field_height, FieldView};
use crate::app::App;
use crate::platform;
use crate::state::forms::{
    focus_slots, FieldKind, FieldSpec, FieldValue, FocusSlot, FooterButton, LookupState,
    StepStatus, SubmissionStatus, WizardForm, WizardShell,
};

const WIZARD_WIDTH: u16 = 78;

/// Draw the open wizard, if any, over the current view
pub fn draw(frame: &mut Frame, app: &App) {
    let Some(form) = app.wizard.as_ref() else {
        return;
    };
    let shell = &form.shell;

    let screen = frame.area();
    let area = centered_rect(screen, WIZARD_WIDTH, screen.height.saturating_sub(2));
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", shell.title()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(Span::styled(
            format!(
                " Step {} of {} ",
                shell.current_step(),
                shell.total_steps()
            ),
            Style::default().fg(Color::DarkGray),
        )))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let banner_rows = shell
        .banner()
        .map(|b| banner_height(b, inner.width))
        .unwrap_or(0);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Progress
            Constraint::Length(2),             // Step title
            Constraint::Min(0),                // Body
            Constraint::Length(banner_rows),   // Banner
            Constraint::Length(BUTTON_HEIGHT), // Footer
        ])
        .split(inner);

    draw_progress(frame, chunks[0], shell);
    draw_step_header(frame, chunks[1], shell);

    match shell.current_spec() {
        Some(step) if step.is_review() => draw_review(frame, chunks[2], shell),
        Some(_) => {
            let active = app.wizard_focus().unwrap_or(FocusSlot::Footer);
            draw_fields(frame, chunks[2], shell, active);
        }
        None => {}
    }

    if let Some(banner) = shell.banner() {
        render_banner(frame, chunks[3], banner);
    }
    draw_footer(frame, chunks[4], form);
}

fn draw_progress(frame: &mut Frame, area: Rect, shell: &WizardShell) {
    let mut spans = Vec::new();
    for (index, (step, status)) in shell.steps().iter().zip(shell.progress()).enumerate() {
        if index > 0 {
            spans.push(Span::styled(" ─ ", Style::default().fg(Color::DarkGray)));
        }
        let (marker, style) = match status {
            StepStatus::Completed => ("✓", Style::default().fg(Color::Green)),
            StepStatus::Current => (
                "●",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            StepStatus::Upcoming => ("○", Style::default().fg(Color::DarkGray)),
        };
        spans.push(Span::styled(
            format!("{marker} {} {}", index + 1, step.title),
            style,
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_step_header(frame: &mut Frame, area: Rect, shell: &WizardShell) {
    let Some(step) = shell.current_spec() else {
        return;
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            step.subtitle,
            Style::default().fg(Color::Gray),
        ))),
        area,
    );
}

/// One drawable row of the step body
struct Row<'a> {
    slot: FocusSlot,
    spec: &'a FieldSpec,
    entry: Option<usize>,
    error: Option<&'a str>,
}

impl Row<'_> {
    fn height(&self) -> u16 {
        let error = u16::from(self.error.is_some());
        field_height(self.spec.is_multiline() && self.entry.is_none()) + error
    }
}

fn draw_fields(frame: &mut Frame, area: Rect, shell: &WizardShell, active: FocusSlot) {
    let Some(step) = shell.current_spec() else {
        return;
    };
    let draft = shell.draft();

    let rows: Vec<Row> = focus_slots(step, draft)
        .into_iter()
        .filter_map(|slot| {
            let (index, entry) = match slot {
                FocusSlot::Field(i) => (i, None),
                FocusSlot::ListEntry { field, entry } => (field, Some(entry)),
                FocusSlot::Footer => return None,
            };
            let spec = step.fields.get(index)?;
            // list errors go under the last entry
            let is_last_entry = entry.map_or(true, |e| e + 1 == draft.list(spec.path).len());
            let error = if is_last_entry {
                shell.errors().get(spec.path)
            } else {
                None
            };
            Some(Row {
                slot,
                spec,
                entry,
                error,
            })
        })
        .collect();

    // scroll so the focused row is visible
    let active_row = rows.iter().position(|r| r.slot == active).unwrap_or(0);
    let mut start = 0;
    while start < active_row
        && rows[start..=active_row].iter().map(Row::height).sum::<u16>() > area.height
    {
        start += 1;
    }

    let mut y = area.y;
    for row in &rows[start..] {
        let height = row.height();
        if y + height > area.y + area.height {
            break;
        }
        let box_height = height - u16::from(row.error.is_some());
        let field_area = Rect::new(area.x, y, area.width, box_height);
        draw_row(frame, field_area, shell, row, row.slot == active);
        if let Some(message) = row.error {
            draw_error(frame, Rect::new(area.x, y + box_height, area.width, 1), message);
        }
        y += height;
    }
}

fn draw_row(frame: &mut Frame, area: Rect, shell: &WizardShell, row: &Row, is_active: bool) {
    let spec = row.spec;
    let draft = shell.draft();

    let label;
    let value;
    let mut placeholder = "";
    let mut is_disabled = false;

    match (row.entry, spec.kind) {
        (Some(entry), _) => {
            label = format!("{} {}", spec.label, entry + 1);
            value = draft
                .list(spec.path)
                .get(entry)
                .cloned()
                .unwrap_or_default();
            placeholder = entry_placeholder(spec, entry);
        }
        (None, FieldKind::Select(source)) => {
            label = spec.label.to_string();
            let id = draft.text(spec.path);
            value = shell
                .options(source)
                .iter()
                .find(|o| o.id == id)
                .map(|o| o.label.clone())
                .unwrap_or_default();
            placeholder = match shell.lookup_state(source) {
                Some(LookupState::Loading) | None => "Loading…",
                Some(LookupState::Unavailable) => "Unavailable",
                Some(LookupState::Ready(options)) if options.is_empty() => "No options",
                Some(LookupState::Ready(_)) => "← → to choose",
            };
            is_disabled = shell.options(source).is_empty();
        }
        (None, FieldKind::Flag) => {
            label = spec.label.to_string();
            let checked = draft.flag(spec.path);
            value = if checked { "[x] Yes" } else { "[ ] No" }.to_string();
        }
        (None, FieldKind::Date) => {
            label = spec.label.to_string();
            value = draft.text(spec.path).to_string();
            placeholder = "YYYY-MM-DD";
        }
        (None, _) => {
            label = spec.label.to_string();
            value = draft
                .get(spec.path)
                .map(FieldValue::display_value)
                .unwrap_or_default();
        }
    }

    draw_field(
        frame,
        area,
        &FieldView {
            label: &label,
            value: &value,
            placeholder,
            is_active,
            is_multiline: spec.is_multiline() && row.entry.is_none(),
            is_required: spec.is_required(),
            has_error: row.error.is_some(),
            is_disabled,
        },
    );
}

/// Only the first entry of an optional list says so
fn entry_placeholder(spec: &FieldSpec, entry: usize) -> &'static str {
    if entry == 0 && !spec.is_required() {
        "optional"
    } else {
        ""
    }
}

/// Read-only summary of every step before submission
fn draw_review(frame: &mut Frame, area: Rect, shell: &WizardShell) {
    let draft = shell.draft();
    let mut lines = Vec::new();

    for step in shell.steps().iter().filter(|s| !s.is_review()) {
        lines.push(Line::from(Span::styled(
            step.title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for field in &step.fields {
            let value = match field.kind {
                FieldKind::Select(source) => {
                    let id = draft.text(field.path);
                    shell
                        .options(source)
                        .iter()
                        .find(|o| o.id == id)
                        .map(|o| o.label.clone())
                        .unwrap_or_else(|| id.to_string())
                }
                _ => draft
                    .get(field.path)
                    .map(FieldValue::display_value)
                    .unwrap_or_default(),
            };
            let value = if value.trim().is_empty() {
                "—".to_string()
            } else {
                value.replace('\n', " ")
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<18}", field.label),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(value),
            ]));
        }
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, form: &WizardForm) {
    let shell = &form.shell;
    let status = shell.status();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(16),
            Constraint::Length(14),
            Constraint::Min(0),
            Constraint::Length(24),
        ])
        .split(area);

    let primary = if !shell.is_terminal_step() {
        "Next".to_string()
    } else {
        match status {
            SubmissionStatus::Submitting => "Submitting…".to_string(),
            SubmissionStatus::Succeeded => "Done".to_string(),
            SubmissionStatus::Idle | SubmissionStatus::Failed => shell.submit_label().to_string(),
        }
    };
    let locked = status.is_busy() || status.is_done();
    let focused = form.is_footer_active();

    render_button(
        frame,
        chunks[0],
        "Previous",
        focused && form.selected_button == FooterButton::Previous,
        !shell.is_first_step() && !locked,
    );
    render_button(
        frame,
        chunks[1],
        "Cancel",
        focused && form.selected_button == FooterButton::Cancel,
        !status.is_busy(),
    );
    render_button(
        frame,
        chunks[3],
        &primary,
        focused && form.selected_button == FooterButton::Primary,
        !locked,
    );

    let hint = if shell.is_terminal_step() {
        format!("{} submit", platform::NEXT)
    } else {
        format!("{} next · {} back", platform::NEXT, platform::PREVIOUS)
    };
    let hint_area = Rect::new(chunks[2].x, chunks[2].y + 1, chunks[2].width, 1);
    frame.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray))).centered(),
        hint_area,
    );
}
