//! Submission lifecycle
//!
//! `Idle -> Submitting -> Succeeded | Failed`, with `Failed -> Submitting` on
//! a new press. Each press gets an attempt number; only the attempt currently
//! in flight can resolve the submission.

use crate::api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionStatus {
    /// An attempt is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionController {
    status: SubmissionStatus,
    attempts: u32,
    in_flight: Option<u32>,
    error: Option<ApiError>,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    /// Error of the last failed attempt
    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// Start an attempt. `None` while one is in flight or after success.
    pub fn begin(&mut self) -> Option<u32> {
        match self.status {
            SubmissionStatus::Submitting | SubmissionStatus::Succeeded => None,
            SubmissionStatus::Idle | SubmissionStatus::Failed => {
                self.attempts += 1;
                self.in_flight = Some(self.attempts);
                self.status = SubmissionStatus::Submitting;
                Some(self.attempts)
            }
        }
    }

    fn take_in_flight(&mut self, attempt: u32) -> bool {
        if self.in_flight == Some(attempt) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// Mark `attempt` successful. Returns false for a stale attempt.
    pub fn succeed(&mut self, attempt: u32) -> bool {
        if !self.take_in_flight(attempt) {
            return false;
        }
        self.status = SubmissionStatus::Succeeded;
        self.error = None;
        true
    }

    /// Mark `attempt` failed. Returns false for a stale attempt.
    pub fn fail(&mut self, attempt: u32, error: ApiError) -> bool {
        if !self.take_in_flight(attempt) {
            return false;
        }
        self.status = SubmissionStatus::Failed;
        self.error = Some(error);
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_moves_to_submitting() {
        let mut controller = SubmissionController::new();
        assert_eq!(controller.begin(), Some(1));
        assert_eq!(controller.status(), SubmissionStatus::Submitting);
    }

    #[test]
    fn test_second_begin_while_submitting_is_noop() {
        let mut controller = SubmissionController::new();
        controller.begin();
        assert_eq!(controller.begin(), None);
        assert_eq!(controller.status(), SubmissionStatus::Submitting);
        // the first attempt is still the one that resolves
        assert!(controller.succeed(1));
    }

    #[test]
    fn test_failed_can_retry() {
        let mut controller = SubmissionController::new();
        let first = controller.begin().unwrap();
        assert!(controller.fail(first, ApiError::rejected("nope")));
        assert_eq!(controller.status(), SubmissionStatus::Failed);
        assert_eq!(controller.error().map(|e| e.to_string()).as_deref(), Some("nope"));

        let second = controller.begin().unwrap();
        assert_eq!(second, 2);
        assert!(controller.succeed(second));
        assert_eq!(controller.status(), SubmissionStatus::Succeeded);
        assert!(controller.error().is_none());
    }

    #[test]
    fn test_succeeded_is_terminal() {
        let mut controller = SubmissionController::new();
        let attempt = controller.begin().unwrap();
        controller.succeed(attempt);
        assert_eq!(controller.begin(), None);
    }

    #[test]
    fn test_stale_attempt_is_ignored() {
        let mut controller = SubmissionController::new();
        let first = controller.begin().unwrap();
        controller.fail(first, ApiError::rejected("x"));
        let second = controller.begin().unwrap();
        assert!(!controller.succeed(first));
        assert_eq!(controller.status(), SubmissionStatus::Submitting);
        assert!(controller.succeed(second));
    }

    #[test]
    fn test_reset() {
        let mut controller = SubmissionController::new();
        controller.begin();
        controller.reset();
        assert_eq!(controller.status(), SubmissionStatus::Idle);
        assert_eq!(controller.begin(), Some(1));
    }
}
