//! Working state of one wizard instance
//!
//! A [`FormDraft`] maps field names to [`FieldValue`]s. Nested objects are
//! stored as [`FieldValue::Group`] and addressed with dotted paths such as
//! `"address.city"`. Once built from its defaults a draft never gains or loses
//! keys: every mutation replaces a value of the same kind in place.

use std::collections::BTreeMap;

use thiserror::Error;

use super::field::FieldValue;

/// Rejected draft mutation. The draft is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("field `{path}` holds a {expected} value, got {found}")]
    KindMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field `{0}` is not a repeatable list")]
    NotAList(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormDraft {
    fields: BTreeMap<String, FieldValue>,
}

impl FormDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used when declaring defaults
    pub fn with(mut self, name: &str, value: FieldValue) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Look up a value by dotted path
    pub fn get(&self, path: &str) -> Option<&FieldValue> {
        match path.split_once('.') {
            None => self.fields.get(path),
            Some((head, rest)) => match self.fields.get(head) {
                Some(FieldValue::Group(group)) => group.get(rest),
                _ => None,
            },
        }
    }

    fn get_mut(&mut self, path: &str) -> Option<&mut FieldValue> {
        match path.split_once('.') {
            None => self.fields.get_mut(path),
            Some((head, rest)) => match self.fields.get_mut(head) {
                Some(FieldValue::Group(group)) => group.get_mut(rest),
                _ => None,
            },
        }
    }

    /// Replace the value at `path`. The new value must be the same kind as the old one.
    pub fn set(&mut self, path: &str, value: FieldValue) -> Result<(), DraftError> {
        let slot = self
            .get_mut(path)
            .ok_or_else(|| DraftError::UnknownField(path.to_string()))?;
        if !slot.same_kind(&value) {
            return Err(DraftError::KindMismatch {
                path: path.to_string(),
                expected: slot.kind_name(),
                found: value.kind_name(),
            });
        }
        *slot = value;
        Ok(())
    }

    /// Text at `path`, empty when missing or not text
    pub fn text(&self, path: &str) -> &str {
        self.get(path).map(FieldValue::as_text).unwrap_or("")
    }

    pub fn number(&self, path: &str) -> i64 {
        self.get(path).map(FieldValue::as_number).unwrap_or(0)
    }

    pub fn flag(&self, path: &str) -> bool {
        self.get(path).is_some_and(FieldValue::as_flag)
    }

    pub fn list(&self, path: &str) -> &[String] {
        self.get(path).map(FieldValue::as_list).unwrap_or(&[])
    }

    /// Entries of a list with blanks removed, trimmed. Only used when building payloads.
    pub fn non_blank_entries(&self, path: &str) -> Vec<String> {
        self.list(path)
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn list_mut(&mut self, path: &str) -> Result<&mut Vec<String>, DraftError> {
        match self.get_mut(path) {
            Some(FieldValue::List(entries)) => Ok(entries),
            Some(_) => Err(DraftError::NotAList(path.to_string())),
            None => Err(DraftError::UnknownField(path.to_string())),
        }
    }

    /// Append an empty entry to a repeatable list
    pub fn append_to_list(&mut self, path: &str) -> Result<(), DraftError> {
        self.list_mut(path)?.push(String::new());
        Ok(())
    }

    /// Remove one entry. Returns `Ok(false)` when nothing was removed: the
    /// list is down to its last entry or `index` is out of range.
    pub fn remove_from_list(&mut self, path: &str, index: usize) -> Result<bool, DraftError> {
        let entries = self.list_mut(path)?;
        if entries.len() <= 1 || index >= entries.len() {
            return Ok(false);
        }
        entries.remove(index);
        Ok(true)
    }

    /// Overwrite one list entry
    pub fn set_list_entry(
        &mut self,
        path: &str,
        index: usize,
        text: String,
    ) -> Result<(), DraftError> {
        let entries = self.list_mut(path)?;
        match entries.get_mut(index) {
            Some(entry) => {
                *entry = text;
                Ok(())
            }
            None => Err(DraftError::UnknownField(format!("{path}[{index}]"))),
        }
    }

    /// All leaf paths in key order, nested groups flattened with dots
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (name, value) in &self.fields {
            match value {
                FieldValue::Group(group) => {
                    out.extend(group.paths().into_iter().map(|p| format!("{name}.{p}")));
                }
                _ => out.push(name.clone()),
            }
        }
        out
    }

    /// Reset every value to its unset sentinel, keeping all keys
    pub fn clear_values(&mut self) {
        for value in self.fields.values_mut() {
            value.clear();
        }
    }
}
