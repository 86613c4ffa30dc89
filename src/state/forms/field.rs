//! Form field value objects

use super::draft::FormDraft;

/// Type-safe field values
///
/// Every value has an "unset" sentinel (empty string, zero, false, a single
/// empty list entry) so a draft never needs to drop a key.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(i64),
    Flag(bool),
    /// Repeatable field (objectives, tags, ...). Holds at least one entry while editing.
    List(Vec<String>),
    /// Nested object such as an address.
    Group(FormDraft),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Empty text value
    pub fn text() -> Self {
        FieldValue::Text(String::new())
    }

    /// Text value with initial content
    pub fn text_with_value(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Repeatable list with a single empty entry
    pub fn list() -> Self {
        FieldValue::List(vec![String::new()])
    }

    /// Repeatable list seeded from existing values, keeping the one-entry floor
    pub fn list_with_values(values: Vec<String>) -> Self {
        if values.is_empty() {
            Self::list()
        } else {
            FieldValue::List(values)
        }
    }

    /// Short name of the variant, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Number(_) => "number",
            FieldValue::Flag(_) => "flag",
            FieldValue::List(_) => "list",
            FieldValue::Group(_) => "group",
        }
    }

    /// Whether `other` can replace this value without changing the draft's shape
    pub fn same_kind(&self, other: &FieldValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Get the text value (returns empty string for other kinds)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    /// Get the number value (returns 0 for other kinds)
    pub fn as_number(&self) -> i64 {
        match self {
            FieldValue::Number(n) => *n,
            _ => 0,
        }
    }

    pub fn as_flag(&self) -> bool {
        matches!(self, FieldValue::Flag(true))
    }

    /// Get the list entries (empty slice for other kinds)
    pub fn as_list(&self) -> &[String] {
        match self {
            FieldValue::List(entries) => entries,
            _ => &[],
        }
    }

    /// True when the value is the unset sentinel for its kind
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(n) => *n == 0,
            FieldValue::Flag(b) => !b,
            FieldValue::List(entries) => entries.iter().all(|e| e.trim().is_empty()),
            FieldValue::Group(_) => false,
        }
    }

    /// Push a character to the field value
    pub fn push_char(&mut self, c: char) {
        match self {
            FieldValue::Text(s) => s.push(c),
            FieldValue::Number(n) => {
                if let Some(d) = c.to_digit(10) {
                    *n = n.saturating_mul(10).saturating_add(i64::from(d));
                }
            }
            FieldValue::Flag(_) | FieldValue::List(_) | FieldValue::Group(_) => {}
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        match self {
            FieldValue::Text(s) => {
                s.pop();
            }
            FieldValue::Number(n) => *n /= 10,
            FieldValue::Flag(_) | FieldValue::List(_) | FieldValue::Group(_) => {}
        }
    }

    /// Toggle a flag value; other kinds are left alone
    pub fn toggle(&mut self) {
        if let FieldValue::Flag(b) = self {
            *b = !*b;
        }
    }

    /// Reset the value to its unset sentinel
    pub fn clear(&mut self) {
        match self {
            FieldValue::Text(s) => s.clear(),
            FieldValue::Number(n) => *n = 0,
            FieldValue::Flag(b) => *b = false,
            FieldValue::List(entries) => *entries = vec![String::new()],
            FieldValue::Group(group) => group.clear_values(),
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(0) => String::new(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Flag(true) => "Yes".to_string(),
            FieldValue::Flag(false) => "No".to_string(),
            FieldValue::List(entries) => entries
                .iter()
                .filter(|e| !e.trim().is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
            FieldValue::Group(_) => String::new(),
        }
    }
}
