//! Concrete wizards
//!
//! A [`WizardFlow`] supplies what differs between wizards: the steps, the
//! starting draft, which dropdowns to preload, and how a finished draft is
//! turned into an API call. Everything else lives in the shell.

mod class;
mod student;

use async_trait::async_trait;

use super::draft::FormDraft;
use super::schema::StepSpec;
use crate::api::{ApiClientTrait, ApiError};
use crate::state::LookupSource;

pub use class::CreateClassFlow;
pub use student::{CreateStudentFlow, EditStudentFlow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardKind {
    CreateClass,
    CreateStudent,
    EditStudent,
}

impl WizardKind {
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::EditStudent)
    }

    /// Noun used in confirmations
    pub fn entity(&self) -> &'static str {
        match self {
            Self::CreateClass => "Class",
            Self::CreateStudent | Self::EditStudent => "Student",
        }
    }
}

/// What a successful submission reports back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub entity_id: String,
    /// Human readable name of the saved entity
    pub label: String,
}

#[async_trait]
pub trait WizardFlow: Send + Sync {
    fn kind(&self) -> WizardKind;

    fn title(&self) -> &'static str;

    fn steps(&self) -> &[StepSpec];

    /// Draft the wizard opens with and resets to
    fn seed(&self) -> FormDraft;

    /// Dropdowns to load when the wizard opens
    fn lookups(&self) -> Vec<LookupSource> {
        Vec::new()
    }

    /// Label of the final action
    fn submit_label(&self) -> &'static str {
        "Submit"
    }

    /// Build the request from `draft` and send it. Called once per Submit press.
    async fn submit(
        &self,
        api: &dyn ApiClientTrait,
        draft: &FormDraft,
    ) -> Result<SubmitReceipt, ApiError>;
}

/// Parse an optional ISO date field for a request body
fn optional_date(draft: &FormDraft, path: &str) -> Result<Option<chrono::NaiveDate>, ApiError> {
    let text = draft.text(path).trim();
    if text.is_empty() {
        return Ok(None);
    }
    super::validator::parse_date(text)
        .map(Some)
        .ok_or_else(|| ApiError::Payload(format!("`{path}` is not a valid date")))
}

fn required_date(draft: &FormDraft, path: &str) -> Result<chrono::NaiveDate, ApiError> {
    optional_date(draft, path)?.ok_or_else(|| ApiError::Payload(format!("`{path}` is required")))
}

fn non_negative(draft: &FormDraft, path: &str) -> Result<u32, ApiError> {
    u32::try_from(draft.number(path))
        .map_err(|_| ApiError::Payload(format!("`{path}` is out of range")))
}
