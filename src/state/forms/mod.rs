//! Stepped form engine
//!
//! Field values and drafts, step declarations, validation, step and
//! submission controllers, and the [`WizardShell`] that composes them.
//! The concrete wizards live in [`flows`].

mod draft;
mod field;
pub mod flows;
mod form_state;
mod schema;
mod step;
mod submission;
mod validator;
mod wizard;

pub use draft::{DraftError, FormDraft};
pub use field::FieldValue;
pub use flows::{
    CreateClassFlow, CreateStudentFlow, EditStudentFlow, SubmitReceipt, WizardFlow, WizardKind,
};
pub use form_state::{focus_slots, FocusSlot, FooterButton, Form, WizardForm};
pub use schema::{FieldKind, FieldSpec, StepSpec};
pub use step::{StepController, StepStatus};
pub use submission::{SubmissionController, SubmissionStatus};
pub use validator::{parse_date, validate, ErrorMap, Rule};
pub use wizard::{
    Banner, BannerKind, CompletionNotice, LookupState, ShellError, SubmitTicket, TicketKey,
    WizardShell,
};
