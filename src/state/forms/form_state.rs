//! Keyboard focus over an open wizard

use super::draft::FormDraft;
use super::field::FieldValue;
use super::schema::{FieldKind, FieldSpec, StepSpec};
use super::wizard::WizardShell;

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// One Tab stop of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusSlot {
    /// Index into the step's fields
    Field(usize),
    /// One entry of a repeatable list field
    ListEntry { field: usize, entry: usize },
    /// The button row
    Footer,
}

/// Tab stops of `step` in order. List fields get one stop per entry; the
/// button row is always last.
pub fn focus_slots(step: &StepSpec, draft: &FormDraft) -> Vec<FocusSlot> {
    let mut slots = Vec::new();
    for (index, field) in step.fields.iter().enumerate() {
        if field.kind == FieldKind::List {
            let entries = draft.list(field.path).len().max(1);
            slots.extend((0..entries).map(|entry| FocusSlot::ListEntry {
                field: index,
                entry,
            }));
        } else {
            slots.push(FocusSlot::Field(index));
        }
    }
    slots.push(FocusSlot::Footer);
    slots
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterButton {
    Previous,
    Cancel,
    /// Next, or Submit on the last step
    Primary,
}

impl FooterButton {
    const ORDER: [FooterButton; 3] = [Self::Previous, Self::Cancel, Self::Primary];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|b| *b == self).unwrap_or(0)
    }
}

/// An open wizard plus which input has focus
#[derive(Debug)]
pub struct WizardForm {
    pub shell: WizardShell,
    pub active_field_index: usize,
    pub selected_button: FooterButton,
}

impl WizardForm {
    pub fn new(shell: WizardShell) -> Self {
        Self {
            shell,
            active_field_index: 0,
            selected_button: FooterButton::Primary,
        }
    }

    pub fn slots(&self) -> Vec<FocusSlot> {
        match self.shell.current_spec() {
            Some(step) => focus_slots(step, self.shell.draft()),
            None => vec![FocusSlot::Footer],
        }
    }

    pub fn active_slot(&self) -> FocusSlot {
        let slots = self.slots();
        slots
            .get(self.active_field_index)
            .or(slots.last())
            .copied()
            .unwrap_or(FocusSlot::Footer)
    }

    pub fn is_footer_active(&self) -> bool {
        self.active_slot() == FocusSlot::Footer
    }

    /// Field spec behind the focused slot
    pub fn active_spec(&self) -> Option<&FieldSpec> {
        let step = self.shell.current_spec()?;
        match self.active_slot() {
            FocusSlot::Field(index) | FocusSlot::ListEntry { field: index, .. } => {
                step.fields.get(index)
            }
            FocusSlot::Footer => None,
        }
    }

    pub fn is_active_field_multiline(&self) -> bool {
        self.active_spec().is_some_and(FieldSpec::is_multiline)
    }

    /// Focus the first input of the step, button row on Primary
    pub fn reset_focus(&mut self) {
        self.active_field_index = 0;
        self.selected_button = FooterButton::Primary;
    }

    /// Move focus to the first field that has an error
    pub fn focus_first_error(&mut self) {
        let Some(step) = self.shell.current_spec() else {
            return;
        };
        let errors = self.shell.errors();
        let target = self.slots().iter().position(|slot| match slot {
            FocusSlot::Field(i) | FocusSlot::ListEntry { field: i, .. } => step
                .fields
                .get(*i)
                .is_some_and(|f| errors.contains(f.path)),
            FocusSlot::Footer => false,
        });
        if let Some(index) = target {
            self.active_field_index = index;
        }
    }

    /// Insert a typed character into the focused input
    pub fn type_char(&mut self, c: char) {
        let Some(spec) = self.active_spec() else {
            return;
        };
        let (path, kind) = (spec.path, spec.kind);
        match (self.active_slot(), kind) {
            (FocusSlot::ListEntry { entry, .. }, _) => {
                let mut text = self
                    .shell
                    .draft()
                    .list(path)
                    .get(entry)
                    .cloned()
                    .unwrap_or_default();
                text.push(c);
                self.apply(path, |shell| shell.set_list_entry(path, entry, text));
            }
            (_, FieldKind::Flag) if c == ' ' => self.toggle(),
            (_, FieldKind::Flag | FieldKind::Select(_)) => {}
            (_, FieldKind::Multiline) => {
                self.apply(path, |shell| shell.update_field(path, |v| v.push_char(c)));
            }
            _ if c == '\n' => {}
            _ => self.apply(path, |shell| shell.update_field(path, |v| v.push_char(c))),
        }
    }

    /// Delete the last character of the focused input
    pub fn backspace(&mut self) {
        let Some(spec) = self.active_spec() else {
            return;
        };
        let path = spec.path;
        match self.active_slot() {
            FocusSlot::ListEntry { entry, .. } => {
                let mut text = self
                    .shell
                    .draft()
                    .list(path)
                    .get(entry)
                    .cloned()
                    .unwrap_or_default();
                text.pop();
                self.apply(path, |shell| shell.set_list_entry(path, entry, text));
            }
            FocusSlot::Field(_) => {
                self.apply(path, |shell| shell.update_field(path, FieldValue::pop_char));
            }
            FocusSlot::Footer => {}
        }
    }

    pub fn toggle(&mut self) {
        if let Some(spec) = self.active_spec().filter(|s| s.kind == FieldKind::Flag) {
            let path = spec.path;
            self.apply(path, |shell| shell.update_field(path, FieldValue::toggle));
        }
    }

    /// Step through the options of a focused dropdown
    pub fn cycle_option(&mut self, forward: bool) {
        let Some(spec) = self.active_spec() else {
            return;
        };
        let FieldKind::Select(source) = spec.kind else {
            return;
        };
        let path = spec.path;
        let options = self.shell.options(source);
        if options.is_empty() {
            return;
        }
        let current = self.shell.draft().text(path);
        let next = match options.iter().position(|o| o.id == current) {
            None if forward => 0,
            None => options.len() - 1,
            Some(i) if forward => (i + 1) % options.len(),
            Some(0) => options.len() - 1,
            Some(i) => i - 1,
        };
        let id = options[next].id.clone();
        self.apply(path, |shell| {
            shell.set_field(path, FieldValue::text_with_value(id))
        });
    }

    /// Add an entry to the focused list and focus it
    pub fn add_entry(&mut self) {
        let Some(spec) = self.active_spec().filter(|s| s.kind == FieldKind::List) else {
            return;
        };
        let path = spec.path;
        if self.shell.append_to_list(path).is_err() {
            return;
        }
        let last = self.shell.draft().list(path).len() - 1;
        if let Some(index) = self.slot_of_entry(path, last) {
            self.active_field_index = index;
        }
    }

    /// Remove the focused list entry. The last entry stays.
    pub fn remove_entry(&mut self) {
        let FocusSlot::ListEntry { entry, .. } = self.active_slot() else {
            return;
        };
        let Some(path) = self.active_spec().map(|s| s.path) else {
            return;
        };
        if let Ok(true) = self.shell.remove_from_list(path, entry) {
            let keep = entry.min(self.shell.draft().list(path).len() - 1);
            if let Some(index) = self.slot_of_entry(path, keep) {
                self.active_field_index = index;
            }
        }
    }

    fn slot_of_entry(&self, path: &str, entry: usize) -> Option<usize> {
        let step = self.shell.current_spec()?;
        let field = step.fields.iter().position(|f| f.path == path)?;
        self.slots()
            .iter()
            .position(|s| *s == FocusSlot::ListEntry { field, entry })
    }

    fn apply<E: std::fmt::Display>(
        &mut self,
        path: &str,
        edit: impl FnOnce(&mut WizardShell) -> Result<(), E>,
    ) {
        if let Err(error) = edit(&mut self.shell) {
            tracing::warn!(path, %error, "edit rejected");
        }
    }

    pub fn next_button(&mut self) {
        let i = (self.selected_button.position() + 1) % FooterButton::ORDER.len();
        self.selected_button = FooterButton::ORDER[i];
    }

    pub fn prev_button(&mut self) {
        let len = FooterButton::ORDER.len();
        let i = (self.selected_button.position() + len - 1) % len;
        self.selected_button = FooterButton::ORDER[i];
    }
}

impl Form for WizardForm {
    fn field_count(&self) -> usize {
        self.slots().len()
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.field_count() - 1);
    }
}
