//! Wizard shell
//!
//! [`WizardShell`] ties one [`WizardFlow`] to its draft, errors, step position
//! and submission state, and owns the open/close lifecycle. It never awaits on
//! its own: submissions are handed out as [`SubmitTicket`]s that the caller runs
//! wherever it likes and feeds back through [`WizardShell::resolve_submit`].
//!
//! Every open gets a fresh instance id. Tickets and lookup results carry the id
//! they were issued under, and anything that arrives for another id is dropped,
//! so a result landing after the wizard was closed cannot touch a new session.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use uuid::Uuid;

use super::draft::{DraftError, FormDraft};
use super::field::FieldValue;
use super::flows::{SubmitReceipt, WizardFlow, WizardKind};
use super::schema::StepSpec;
use super::step::{StepController, StepStatus};
use super::submission::{SubmissionController, SubmissionStatus};
use super::validator::{validate, ErrorMap};
use crate::api::{ApiClientTrait, ApiError};
use crate::state::{LookupOption, LookupSource};

const FIX_FIELDS_MESSAGE: &str = "Please fix the highlighted fields before submitting.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("cannot close while a submission is in flight")]
    SubmissionInFlight,

    #[error("wizard is not open")]
    NotOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Success,
}

/// Message shown above the footer of the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    /// Raw server text, shown under the friendly wording when it differs
    pub detail: Option<String>,
}

impl Banner {
    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
            detail: None,
        }
    }

    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            message: message.into(),
            detail: None,
        }
    }

    fn failure(error: &ApiError) -> Self {
        let message = error.friendly_message();
        let raw = error.to_string();
        Self {
            kind: BannerKind::Error,
            detail: (raw != message).then_some(raw),
            message,
        }
    }
}

/// State of a preloaded dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupState {
    Loading,
    Ready(Vec<LookupOption>),
    /// The preload failed; the dropdown renders empty and disabled
    Unavailable,
}

/// Passed to the completion callback after a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionNotice {
    pub kind: WizardKind,
    pub entity_id: String,
    pub label: String,
}

/// Identifies one submit press of one wizard instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketKey {
    pub wizard_id: Uuid,
    pub attempt: u32,
}

/// A submission ready to be sent. Holds its own copy of the draft.
pub struct SubmitTicket {
    key: TicketKey,
    draft: FormDraft,
    flow: Arc<dyn WizardFlow>,
}

impl SubmitTicket {
    pub fn key(&self) -> TicketKey {
        self.key
    }

    /// Run the flow's create or update call
    pub async fn execute(&self, api: &dyn ApiClientTrait) -> Result<SubmitReceipt, ApiError> {
        self.flow.submit(api, &self.draft).await
    }
}

type CompletionCallback = Box<dyn FnMut(&CompletionNotice) + Send>;

pub struct WizardShell {
    id: Uuid,
    flow: Arc<dyn WizardFlow>,
    steps: StepController,
    submission: SubmissionController,
    seed: FormDraft,
    draft: FormDraft,
    errors: ErrorMap,
    banner: Option<Banner>,
    lookups: HashMap<LookupSource, LookupState>,
    is_open: bool,
    close_at: Option<Instant>,
    auto_close: Duration,
    on_complete: Option<CompletionCallback>,
}

impl fmt::Debug for WizardShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardShell")
            .field("id", &self.id)
            .field("kind", &self.flow.kind())
            .field("step", &self.steps.current())
            .field("status", &self.submission.status())
            .field("is_open", &self.is_open)
            .finish_non_exhaustive()
    }
}

impl WizardShell {
    /// A closed wizard. Call [`open`](Self::open) to start a session.
    pub fn new(flow: Arc<dyn WizardFlow>, auto_close: Duration) -> Self {
        let seed = flow.seed();
        Self {
            id: Uuid::new_v4(),
            steps: StepController::new(flow.steps().len()),
            submission: SubmissionController::new(),
            draft: seed.clone(),
            seed,
            errors: ErrorMap::new(),
            banner: None,
            lookups: HashMap::new(),
            is_open: false,
            close_at: None,
            auto_close,
            on_complete: None,
            flow,
        }
    }

    /// Called once per successful submission, before the wizard closes
    pub fn with_on_complete(
        mut self,
        callback: impl FnMut(&CompletionNotice) + Send + 'static,
    ) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Start a fresh session and return the lookups the caller should preload
    pub fn open(&mut self) -> Vec<LookupSource> {
        self.id = Uuid::new_v4();
        self.reset_session();
        self.is_open = true;

        let sources = self.flow.lookups();
        self.lookups = sources
            .iter()
            .map(|source| (*source, LookupState::Loading))
            .collect();

        tracing::info!(wizard = ?self.flow.kind(), id = %self.id, "wizard opened");
        sources
    }

    fn reset_session(&mut self) {
        self.draft = self.seed.clone();
        self.steps.reset();
        self.submission.reset();
        self.errors.clear();
        self.banner = None;
        self.close_at = None;
    }

    /// Close the wizard and discard the draft. Refused while submitting.
    pub fn close(&mut self) -> Result<(), ShellError> {
        if !self.is_open {
            return Err(ShellError::NotOpen);
        }
        if self.submission.status() == SubmissionStatus::Submitting {
            return Err(ShellError::SubmissionInFlight);
        }
        self.finish_close();
        Ok(())
    }

    fn finish_close(&mut self) {
        self.is_open = false;
        self.reset_session();
        self.lookups.clear();
        tracing::debug!(id = %self.id, "wizard closed");
    }

    /// Close once the auto-close deadline has passed. Returns true if it closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.close_at {
            Some(at) if self.is_open && now >= at => {
                self.finish_close();
                true
            }
            _ => false,
        }
    }

    // Accessors

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> WizardKind {
        self.flow.kind()
    }

    pub fn title(&self) -> &'static str {
        self.flow.title()
    }

    pub fn submit_label(&self) -> &'static str {
        self.flow.submit_label()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn steps(&self) -> &[StepSpec] {
        self.flow.steps()
    }

    /// 1-based
    pub fn current_step(&self) -> usize {
        self.steps.current()
    }

    pub fn total_steps(&self) -> usize {
        self.steps.total()
    }

    pub fn current_spec(&self) -> Option<&StepSpec> {
        self.flow.steps().get(self.steps.current() - 1)
    }

    pub fn is_first_step(&self) -> bool {
        self.steps.is_first()
    }

    pub fn is_terminal_step(&self) -> bool {
        self.steps.is_terminal()
    }

    pub fn progress(&self) -> Vec<StepStatus> {
        self.steps.progress()
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.submission.status()
    }


    pub fn close_deadline(&self) -> Option<Instant> {
        self.close_at
    }

    // Field model

    /// Replace the value at `path` and clear that field's error
    pub fn set_field(&mut self, path: &str, value: FieldValue) -> Result<(), DraftError> {
        self.draft.set(path, value)?;
        self.errors.remove(path);
        Ok(())
    }

    /// Edit the value at `path` in place, e.g. for a keystroke
    pub fn update_field(
        &mut self,
        path: &str,
        edit: impl FnOnce(&mut FieldValue),
    ) -> Result<(), DraftError> {
        let mut value = self
            .draft
            .get(path)
            .cloned()
            .ok_or_else(|| DraftError::UnknownField(path.to_string()))?;
        edit(&mut value);
        self.set_field(path, value)
    }

    pub fn set_list_entry(
        &mut self,
        path: &str,
        index: usize,
        text: String,
    ) -> Result<(), DraftError> {
        self.draft.set_list_entry(path, index, text)?;
        self.errors.remove(path);
        Ok(())
    }

    pub fn append_to_list(&mut self, path: &str) -> Result<(), DraftError> {
        self.draft.append_to_list(path)
    }

    pub fn remove_from_list(&mut self, path: &str, index: usize) -> Result<bool, DraftError> {
        self.draft.remove_from_list(path, index)
    }

    /// Restore the draft the wizard opened with
    pub fn reset_all(&mut self) {
        self.draft = self.seed.clone();
        self.errors.clear();
    }

    // Navigation

    /// Validate the current step and advance. On failure the step's errors are kept.
    pub fn next(&mut self) -> bool {
        if !self.is_open || self.steps.is_terminal() {
            return false;
        }
        match self.steps.next(self.flow.steps(), &self.draft) {
            Ok(step) => {
                self.errors.clear();
                tracing::debug!(id = %self.id, step, "advanced");
                true
            }
            Err(errors) => {
                tracing::debug!(id = %self.id, failing = errors.len(), "step blocked");
                self.errors = errors;
                false
            }
        }
    }

    pub fn previous(&mut self) -> bool {
        if !self.is_open || self.steps.is_first() {
            return false;
        }
        self.steps.previous();
        self.errors.clear();
        true
    }

    /// Jump back to a visited step
    pub fn go_to(&mut self, step: usize) -> bool {
        if !self.is_open || !self.steps.go_to(step) {
            return false;
        }
        self.errors.clear();
        true
    }

    // Submission

    /// Start a submission from the terminal step.
    ///
    /// Returns `None` when not on the terminal step, while another attempt is
    /// in flight, after success, or when the step does not validate.
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        if !self.is_open || !self.steps.is_terminal() {
            return None;
        }
        if matches!(
            self.submission.status(),
            SubmissionStatus::Submitting | SubmissionStatus::Succeeded
        ) {
            return None;
        }

        if let Some(step) = self.current_spec() {
            let errors = validate(step, &self.draft);
            if !errors.is_empty() {
                self.errors = errors;
                self.banner = Some(Banner::error(FIX_FIELDS_MESSAGE));
                return None;
            }
        }

        let attempt = self.submission.begin()?;
        self.banner = None;
        tracing::info!(wizard = ?self.flow.kind(), id = %self.id, attempt, "submitting");
        Some(SubmitTicket {
            key: TicketKey {
                wizard_id: self.id,
                attempt,
            },
            draft: self.draft.clone(),
            flow: Arc::clone(&self.flow),
        })
    }

    /// Apply the outcome of a ticket. Returns false when it was dropped.
    pub fn resolve_submit(
        &mut self,
        key: TicketKey,
        result: Result<SubmitReceipt, ApiError>,
        now: Instant,
    ) -> bool {
        if !self.is_open || key.wizard_id != self.id {
            tracing::debug!(
                ticket = %key.wizard_id,
                current = %self.id,
                "dropping result for a closed wizard"
            );
            return false;
        }

        match result {
            Ok(receipt) => {
                if !self.submission.succeed(key.attempt) {
                    return false;
                }
                let kind = self.flow.kind();
                let verb = if kind.is_edit() { "updated" } else { "created" };
                self.banner = Some(Banner::success(format!(
                    "{} \"{}\" {verb}",
                    kind.entity(),
                    receipt.label
                )));

                let notice = CompletionNotice {
                    kind,
                    entity_id: receipt.entity_id,
                    label: receipt.label,
                };
                if let Some(callback) = self.on_complete.as_mut() {
                    callback(&notice);
                }
                self.close_at = Some(now + self.auto_close);
                tracing::info!(
                    wizard = ?kind,
                    entity_id = %notice.entity_id,
                    "submission succeeded"
                );
                true
            }
            Err(error) => {
                tracing::warn!(wizard = ?self.flow.kind(), %error, "submission failed");
                if !self.submission.fail(key.attempt, error) {
                    return false;
                }
                self.banner = self.submission.error().map(Banner::failure);
                true
            }
        }
    }

    /// Begin, send and resolve in one go
    pub async fn submit(&mut self, api: &dyn ApiClientTrait) -> bool {
        let Some(ticket) = self.begin_submit() else {
            return false;
        };
        let result = ticket.execute(api).await;
        self.resolve_submit(ticket.key(), result, Instant::now())
    }

    pub fn dismiss_banner(&mut self) -> bool {
        self.banner.take().is_some()
    }

    // Lookups

    /// Store a preloaded dropdown. Failures leave the dropdown empty.
    pub fn apply_lookup(
        &mut self,
        wizard_id: Uuid,
        source: LookupSource,
        result: Result<Vec<LookupOption>, ApiError>,
    ) -> bool {
        if !self.is_open || wizard_id != self.id {
            return false;
        }
        let state = match result {
            Ok(options) => {
                tracing::debug!(source = source.label(), count = options.len(), "lookup loaded");
                LookupState::Ready(options)
            }
            Err(error) => {
                tracing::warn!(source = source.label(), %error, "lookup failed");
                LookupState::Unavailable
            }
        };
        self.lookups.insert(source, state);
        true
    }

    pub fn lookup_state(&self, source: LookupSource) -> Option<&LookupState> {
        self.lookups.get(&source)
    }

    /// Options of a dropdown, empty until loaded or when the preload failed
    pub fn options(&self, source: LookupSource) -> &[LookupOption] {
        match self.lookups.get(&source) {
            Some(LookupState::Ready(options)) => options,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApiClientTrait;
    use crate::state::forms::flows::{CreateClassFlow, CreateStudentFlow};
    use crate::state::Class;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const AUTO_CLOSE: Duration = Duration::from_millis(1500);

    fn class_wizard() -> WizardShell {
        let mut shell = WizardShell::new(Arc::new(CreateClassFlow::new()), AUTO_CLOSE);
        shell.open();
        shell
    }

    fn text(shell: &mut WizardShell, path: &str, value: &str) {
        shell
            .set_field(path, FieldValue::text_with_value(value))
            .unwrap();
    }

    fn fill_basics(shell: &mut WizardShell) {
        text(shell, "courseId", "c-101");
        text(shell, "instructorId", "i-1");
        text(shell, "className", "Intro");
        text(shell, "description", "desc");
    }

    fn fill_schedule(shell: &mut WizardShell) {
        text(shell, "startDate", "2025-09-01");
        text(shell, "endDate", "2025-12-15");
    }

    /// Class wizard on the review step with one objective
    fn class_wizard_at_review() -> WizardShell {
        let mut shell = class_wizard();
        fill_basics(&mut shell);
        assert!(shell.next());
        fill_schedule(&mut shell);
        assert!(shell.next());
        shell.set_list_entry("objectives", 0, "Learn X".into()).unwrap();
        assert!(shell.next());
        assert!(shell.is_terminal_step());
        shell
    }

    fn created(p: &crate::state::NewClass) -> Result<Class, ApiError> {
        Ok(Class {
            id: "cls-1".into(),
            details: p.clone(),
        })
    }

    mod navigation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_blocked_next_keeps_step_and_reports_errors() {
            // Scenario A, first half
            let mut shell = class_wizard();
            text(&mut shell, "instructorId", "i-1");
            assert!(!shell.next());
            assert_eq!(shell.current_step(), 1);
            assert!(shell.errors().contains("courseId"));
            assert!(!shell.errors().contains("instructorId"));
        }

        #[test]
        fn test_filled_basics_advance() {
            let mut shell = class_wizard();
            assert!(!shell.next());
            fill_basics(&mut shell);
            assert!(shell.next());
            assert_eq!(shell.current_step(), 2);
            assert!(shell.errors().is_empty());
        }

        #[test]
        fn test_cross_field_capacity_bound() {
            let mut shell = class_wizard();
            fill_basics(&mut shell);
            shell.next();
            fill_schedule(&mut shell);
            shell.set_field("capacity", FieldValue::Number(10)).unwrap();
            shell
                .set_field("maxEnrollments", FieldValue::Number(15))
                .unwrap();
            assert!(!shell.next());
            assert_eq!(
                shell.errors().get("maxEnrollments"),
                Some("Max enrollments cannot exceed capacity")
            );

            shell
                .set_field("maxEnrollments", FieldValue::Number(8))
                .unwrap();
            assert!(shell.next());
            assert_eq!(shell.current_step(), 3);
        }

        #[test]
        fn test_objectives_need_one_non_blank_entry() {
            let mut shell = class_wizard();
            fill_basics(&mut shell);
            shell.next();
            fill_schedule(&mut shell);
            shell.next();

            assert!(!shell.next());
            assert!(shell.errors().contains("objectives"));

            shell.append_to_list("objectives").unwrap();
            shell.set_list_entry("objectives", 1, "Learn X".into()).unwrap();
            assert!(shell.next());
            assert_eq!(
                shell.draft().list("objectives"),
                &[String::new(), "Learn X".to_string()]
            );
        }

        #[test]
        fn test_next_never_passes_last_step() {
            let mut shell = class_wizard_at_review();
            assert!(!shell.next());
            assert_eq!(shell.current_step(), shell.total_steps());
        }

        #[test]
        fn test_previous_ignores_validity() {
            let mut shell = class_wizard();
            fill_basics(&mut shell);
            shell.next();
            text(&mut shell, "className", "");
            text(&mut shell, "startDate", "not a date");
            assert!(shell.previous());
            assert_eq!(shell.current_step(), 1);
            assert!(!shell.previous());
            assert_eq!(shell.current_step(), 1);
        }

        #[test]
        fn test_go_to_only_moves_back() {
            let mut shell = class_wizard_at_review();
            assert!(!shell.go_to(5));
            assert!(shell.go_to(2));
            assert_eq!(shell.current_step(), 2);
            assert!(!shell.go_to(3));
            assert_eq!(
                shell.progress(),
                vec![
                    StepStatus::Completed,
                    StepStatus::Current,
                    StepStatus::Upcoming,
                    StepStatus::Upcoming
                ]
            );
        }

        #[test]
        fn test_closed_wizard_does_not_move() {
            let mut shell = WizardShell::new(Arc::new(CreateClassFlow::new()), AUTO_CLOSE);
            fill_basics(&mut shell);
            assert!(!shell.next());
            assert_eq!(shell.current_step(), 1);
        }
    }

    mod fields {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_edit_clears_only_that_error() {
            let mut shell = class_wizard();
            shell.next();
            assert!(shell.errors().contains("courseId"));
            assert!(shell.errors().contains("className"));

            // still blank, the error goes anyway
            text(&mut shell, "courseId", "   ");
            assert!(!shell.errors().contains("courseId"));
            assert!(shell.errors().contains("className"));
        }

        #[test]
        fn test_rejected_set_keeps_error() {
            let mut shell = class_wizard();
            shell.next();
            assert!(shell.set_field("courseId", FieldValue::Number(3)).is_err());
            assert!(shell.errors().contains("courseId"));
        }

        #[test]
        fn test_update_field_applies_keystrokes() {
            let mut shell = class_wizard();
            shell.update_field("className", |v| v.push_char('A')).unwrap();
            shell.update_field("capacity", |v| v.push_char('5')).unwrap();
            assert_eq!(shell.draft().text("className"), "A");
            assert_eq!(shell.draft().number("capacity"), 305);
            assert_eq!(
                shell.update_field("nope", |v| v.push_char('x')),
                Err(DraftError::UnknownField("nope".into()))
            );
        }

        #[test]
        fn test_list_floor() {
            let mut shell = class_wizard();
            assert!(!shell.remove_from_list("prerequisites", 0).unwrap());
            shell.append_to_list("prerequisites").unwrap();
            shell.set_list_entry("prerequisites", 0, "a".into()).unwrap();
            shell.set_list_entry("prerequisites", 1, "b".into()).unwrap();
            shell.append_to_list("prerequisites").unwrap();
            shell.set_list_entry("prerequisites", 2, "c".into()).unwrap();

            assert!(shell.remove_from_list("prerequisites", 1).unwrap());
            assert_eq!(
                shell.draft().list("prerequisites"),
                &["a".to_string(), "c".to_string()]
            );
        }

        #[test]
        fn test_reset_all_is_idempotent() {
            let mut shell = class_wizard();
            fill_basics(&mut shell);
            shell.reset_all();
            let first = shell.draft().clone();
            shell.reset_all();
            assert_eq!(shell.draft(), &first);
            assert_eq!(&first, &CreateClassFlow::new().seed());
        }
    }

    mod submission {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_submit_only_from_terminal_step() {
            let mut shell = class_wizard();
            assert!(shell.begin_submit().is_none());
            assert_eq!(shell.status(), SubmissionStatus::Idle);
        }

        #[tokio::test]
        async fn test_second_press_while_submitting_is_ignored() {
            let mut api = MockApiClientTrait::new();
            api.expect_create_class().times(1).returning(created);

            let mut shell = class_wizard_at_review();
            let ticket = shell.begin_submit().unwrap();
            let draft_before = shell.draft().clone();

            assert!(shell.begin_submit().is_none());
            assert!(!shell.submit(&api).await);
            assert_eq!(shell.status(), SubmissionStatus::Submitting);
            assert_eq!(shell.draft(), &draft_before);
            assert!(shell.banner().is_none());

            let result = ticket.execute(&api).await;
            assert!(shell.resolve_submit(ticket.key(), result, Instant::now()));
            assert_eq!(shell.status(), SubmissionStatus::Succeeded);
        }

        #[tokio::test]
        async fn test_failure_keeps_draft_and_allows_retry() {
            // Scenario D
            let mut calls = 0;
            let mut api = MockApiClientTrait::new();
            api.expect_create_class().times(2).returning(move |p| {
                calls += 1;
                if calls == 1 {
                    Err(ApiError::rejected("email already in use"))
                } else {
                    created(p)
                }
            });

            let mut shell = class_wizard_at_review();
            let draft_before = shell.draft().clone();

            assert!(shell.submit(&api).await);
            assert_eq!(shell.status(), SubmissionStatus::Failed);
            assert_eq!(shell.draft(), &draft_before);
            let banner = shell.banner().unwrap();
            assert_eq!(banner.kind, BannerKind::Error);
            assert!(banner.message.contains("email"));
            assert_eq!(banner.detail.as_deref(), Some("email already in use"));
            assert!(shell.is_open());

            assert!(shell.submit(&api).await);
            assert_eq!(shell.status(), SubmissionStatus::Succeeded);
        }

        #[tokio::test]
        async fn test_success_fires_callback_then_auto_closes() {
            // Scenario E
            let fired = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&fired);

            let mut api = MockApiClientTrait::new();
            api.expect_create_class()
                .withf(|p| p.objectives == vec!["Learn X".to_string()])
                .times(1)
                .returning(created);

            let mut shell = WizardShell::new(Arc::new(CreateClassFlow::new()), AUTO_CLOSE)
                .with_on_complete(move |notice| {
                    assert_eq!(notice.entity_id, "cls-1");
                    assert_eq!(notice.label, "Intro");
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            shell.open();
            fill_basics(&mut shell);
            shell.next();
            fill_schedule(&mut shell);
            shell.next();
            shell.append_to_list("objectives").unwrap();
            shell.set_list_entry("objectives", 1, "Learn X".into()).unwrap();
            shell.next();

            let ticket = shell.begin_submit().unwrap();
            let result = ticket.execute(&api).await;
            let now = Instant::now();
            assert!(shell.resolve_submit(ticket.key(), result, now));

            assert_eq!(fired.load(Ordering::SeqCst), 1);
            assert_eq!(shell.banner().map(|b| b.kind), Some(BannerKind::Success));
            assert!(shell.is_open());
            assert!(shell.begin_submit().is_none());

            assert!(!shell.tick(now + Duration::from_millis(1499)));
            assert!(shell.is_open());
            assert!(shell.tick(now + AUTO_CLOSE));
            assert!(!shell.is_open());
            assert_eq!(shell.draft(), &CreateClassFlow::new().seed());
            assert_eq!(shell.current_step(), 1);
            assert_eq!(fired.load(Ordering::SeqCst), 1);
        }

        #[test]
        fn test_close_refused_while_submitting() {
            let mut shell = class_wizard_at_review();
            let ticket = shell.begin_submit().unwrap();
            assert_eq!(shell.close(), Err(ShellError::SubmissionInFlight));
            assert!(shell.is_open());

            shell.resolve_submit(
                ticket.key(),
                Err(ApiError::Network("down".into())),
                Instant::now(),
            );
            assert_eq!(shell.close(), Ok(()));
            assert_eq!(shell.close(), Err(ShellError::NotOpen));
        }

        #[test]
        fn test_result_for_other_instance_is_dropped() {
            let mut shell = class_wizard_at_review();
            let ticket = shell.begin_submit().unwrap();
            let stale = TicketKey {
                wizard_id: Uuid::new_v4(),
                attempt: ticket.key().attempt,
            };
            let receipt = SubmitReceipt {
                entity_id: "x".into(),
                label: "x".into(),
            };
            assert!(!shell.resolve_submit(stale, Ok(receipt), Instant::now()));
            assert_eq!(shell.status(), SubmissionStatus::Submitting);
        }

        #[test]
        fn test_close_before_deadline_cancels_timer() {
            let mut shell = class_wizard_at_review();
            let ticket = shell.begin_submit().unwrap();
            let receipt = SubmitReceipt {
                entity_id: "cls-1".into(),
                label: "Intro".into(),
            };
            let now = Instant::now();
            shell.resolve_submit(ticket.key(), Ok(receipt), now);
            assert!(shell.close().is_ok());
            assert!(shell.close_deadline().is_none());
            assert!(!shell.tick(now + AUTO_CLOSE));
        }

        #[test]
        fn test_reopen_starts_clean_session() {
            let mut shell = class_wizard_at_review();
            let first_id = shell.id();
            shell.close().unwrap();
            shell.open();
            assert_ne!(shell.id(), first_id);
            assert_eq!(shell.current_step(), 1);
            assert_eq!(shell.status(), SubmissionStatus::Idle);
            assert!(shell.errors().is_empty());
        }
    }

    mod lookups {
        use super::*;
        use pretty_assertions::assert_eq;
        use crate::state::LookupOption;

        #[test]
        fn test_open_requests_flow_lookups() {
            let mut shell = WizardShell::new(Arc::new(CreateClassFlow::new()), AUTO_CLOSE);
            let sources = shell.open();
            assert_eq!(sources, vec![LookupSource::Courses, LookupSource::Instructors]);
            assert_eq!(
                shell.lookup_state(LookupSource::Courses),
                Some(&LookupState::Loading)
            );

            let mut student = WizardShell::new(Arc::new(CreateStudentFlow::new()), AUTO_CLOSE);
            assert!(student.open().is_empty());
        }

        #[test]
        fn test_failed_lookup_degrades_to_empty() {
            let mut shell = class_wizard();
            let id = shell.id();
            assert!(shell.apply_lookup(
                id,
                LookupSource::Courses,
                Err(ApiError::Network("timeout".into()))
            ));
            assert_eq!(
                shell.lookup_state(LookupSource::Courses),
                Some(&LookupState::Unavailable)
            );
            assert!(shell.options(LookupSource::Courses).is_empty());

            // the wizard still works
            fill_basics(&mut shell);
            assert!(shell.next());
        }

        #[test]
        fn test_lookup_for_previous_session_is_ignored() {
            let mut shell = class_wizard();
            let old_id = shell.id();
            shell.close().unwrap();
            shell.open();
            let options = vec![LookupOption::new("c-1", "MATH 101")];
            assert!(!shell.apply_lookup(old_id, LookupSource::Courses, Ok(options.clone())));
            assert!(shell.apply_lookup(shell.id(), LookupSource::Courses, Ok(options)));
            assert_eq!(shell.options(LookupSource::Courses).len(), 1);
        }
    }
}
