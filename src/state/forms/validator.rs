//! Step-scoped validation
//!
//! [`validate`] is pure: it reads only the fields the step declares and
//! returns one message per failing field.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::draft::FormDraft;
use super::field::FieldValue;
use super::schema::{FieldSpec, StepSpec};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-()]{7,20}$").expect("phone pattern compiles"));

/// A single validation rule attached to a field
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Non-empty after trim; for lists, at least one non-blank entry
    Required,
    /// Non-empty and shaped like `local@domain.tld`
    Email,
    /// Non-empty and made of `+`, digits, spaces, hyphens and parentheses
    Phone,
    /// Phone shape, only checked when a value is present
    OptionalPhone,
    /// ISO date, only checked when a value is present
    Date,
    /// Date not earlier than the date at the given path
    NotBefore {
        path: &'static str,
        label: &'static str,
    },
    /// Number greater than zero
    Positive,
    /// Number not greater than a fixed limit
    NoMoreThan(i64),
    /// Number not greater than the number at the given path
    AtMost {
        path: &'static str,
        label: &'static str,
    },
    /// Repeatable list with at least one non-blank entry
    ListRequired,
}

/// Field path -> human readable message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorMap {
    errors: BTreeMap<String, String>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(path.into(), message.into());
    }

    /// Drop the entry for `path`. Returns true if one was present.
    pub fn remove(&mut self, path: &str) -> bool {
        self.errors.remove(path).is_some()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.errors.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }
}

/// Validate the fields declared by `step` against `draft`
pub fn validate(step: &StepSpec, draft: &FormDraft) -> ErrorMap {
    let mut errors = ErrorMap::new();
    for field in &step.fields {
        if let Some(message) = check_field(field, draft) {
            errors.insert(field.path, message);
        }
    }
    errors
}

fn check_field(field: &FieldSpec, draft: &FormDraft) -> Option<String> {
    let value = draft.get(field.path)?;
    field
        .rules
        .iter()
        .find_map(|rule| check_rule(rule, field.label, value, draft))
}

fn check_rule(rule: &Rule, label: &str, value: &FieldValue, draft: &FormDraft) -> Option<String> {
    match rule {
        Rule::Required => value.is_blank().then(|| format!("{label} is required")),
        Rule::Email => {
            let text = value.as_text().trim();
            if text.is_empty() {
                Some(format!("{label} is required"))
            } else if !EMAIL_RE.is_match(text) {
                Some("Enter a valid email address".to_string())
            } else {
                None
            }
        }
        Rule::Phone => {
            let text = value.as_text().trim();
            if text.is_empty() {
                Some(format!("{label} is required"))
            } else {
                phone_error(text)
            }
        }
        Rule::OptionalPhone => {
            let text = value.as_text().trim();
            if text.is_empty() {
                None
            } else {
                phone_error(text)
            }
        }
        Rule::Date => {
            let text = value.as_text().trim();
            if text.is_empty() || parse_date(text).is_some() {
                None
            } else {
                Some(format!("{label} must be a date like 2025-09-01"))
            }
        }
        Rule::NotBefore { path, label: other } => {
            let this = parse_date(value.as_text().trim())?;
            let that = parse_date(draft.text(path).trim())?;
            (this < that).then(|| format!("{label} cannot be before {other}"))
        }
        Rule::Positive => {
            (value.as_number() <= 0).then(|| format!("{label} must be greater than 0"))
        }
        Rule::NoMoreThan(max) => {
            (value.as_number() > *max).then(|| format!("{label} cannot be more than {max}"))
        }
        Rule::AtMost { path, label: other } => {
            let limit = draft.number(path);
            (value.as_number() > limit).then(|| format!("{label} cannot exceed {other}"))
        }
        Rule::ListRequired => value
            .is_blank()
            .then(|| format!("Add at least one {}", label.to_lowercase())),
    }
}

fn phone_error(text: &str) -> Option<String> {
    let digits = text.chars().filter(char::is_ascii_digit).count();
    if PHONE_RE.is_match(text) && digits >= 7 {
        None
    } else {
        Some("Enter a valid phone number".to_string())
    }
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}
