//! Declarative description of wizard steps
//!
//! Flows describe each step as a list of [`FieldSpec`]s. The validator reads
//! the rules, the UI reads labels and input kinds; neither needs to know which
//! wizard it is working on.

use super::validator::Rule;
use crate::state::LookupSource;

/// How a field is edited and rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    Number,
    Email,
    Phone,
    /// ISO `YYYY-MM-DD` date entered as text
    Date,
    /// Dropdown filled from a lookup preloaded when the wizard opens
    Select(LookupSource),
    Flag,
    /// Repeatable list of strings
    List,
}

/// Represents a single form field with its configuration
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Dotted path into the draft
    pub path: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    pub fn new(path: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            path,
            label,
            kind,
            rules: Vec::new(),
        }
    }

    /// Attach a validation rule. Rules are checked in the order added.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|r| {
            matches!(
                r,
                Rule::Required | Rule::Email | Rule::Phone | Rule::ListRequired | Rule::Positive
            )
        })
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self.kind, FieldKind::Multiline)
    }
}

/// One page of a wizard
#[derive(Debug, Clone)]
pub struct StepSpec {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl StepSpec {
    pub fn new(title: &'static str, subtitle: &'static str) -> Self {
        Self {
            title,
            subtitle,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// A step without fields: the read-only summary before submission
    pub fn is_review(&self) -> bool {
        self.fields.is_empty()
    }
}
