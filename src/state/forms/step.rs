//! Step navigation

use super::draft::FormDraft;
use super::schema::StepSpec;
use super::validator::{validate, ErrorMap};

/// Where a step sits relative to the current one, for the progress indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Current,
    Upcoming,
}

/// Tracks the current step (1-based) of an N-step wizard.
///
/// Moving forward requires the step being left to validate; moving back never does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepController {
    current: usize,
    total: usize,
}

impl StepController {
    pub fn new(total: usize) -> Self {
        Self {
            current: 1,
            total: total.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    /// On the last step Next is replaced by Submit
    pub fn is_terminal(&self) -> bool {
        self.current == self.total
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Validate the current step and advance by one if it passes.
    ///
    /// Returns the step's errors when it does not; the position is unchanged.
    pub fn next(&mut self, steps: &[StepSpec], draft: &FormDraft) -> Result<usize, ErrorMap> {
        if let Some(step) = steps.get(self.current - 1) {
            let errors = validate(step, draft);
            if !errors.is_empty() {
                return Err(errors);
            }
        }
        self.current = (self.current + 1).min(self.total);
        Ok(self.current)
    }

    /// Go back one step, never below the first
    pub fn previous(&mut self) -> usize {
        self.current = self.current.saturating_sub(1).max(1);
        self.current
    }

    /// Jump to an already visited step or stay on the current one.
    /// Forward jumps are ignored and return false.
    pub fn go_to(&mut self, step: usize) -> bool {
        if step == 0 || step > self.current {
            return false;
        }
        self.current = step;
        true
    }

    pub fn progress(&self) -> Vec<StepStatus> {
        (1..=self.total)
            .map(|step| match step.cmp(&self.current) {
                std::cmp::Ordering::Less => StepStatus::Completed,
                std::cmp::Ordering::Equal => StepStatus::Current,
                std::cmp::Ordering::Greater => StepStatus::Upcoming,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::field::FieldValue;
    use crate::state::forms::schema::{FieldKind, FieldSpec};
    use crate::state::forms::validator::Rule;
    use pretty_assertions::assert_eq;

    fn steps() -> Vec<StepSpec> {
        vec![
            StepSpec::new("One", "")
                .field(FieldSpec::new("name", "Name", FieldKind::Text).rule(Rule::Required)),
            StepSpec::new("Two", ""),
            StepSpec::new("Review", ""),
        ]
    }

    fn draft(name: &str) -> FormDraft {
        FormDraft::new().with("name", FieldValue::text_with_value(name))
    }

    #[test]
    fn test_starts_on_first_step() {
        let controller = StepController::new(3);
        assert_eq!(controller.current(), 1);
        assert!(controller.is_first());
        assert!(!controller.is_terminal());
    }

    #[test]
    fn test_zero_steps_clamps_to_one() {
        let controller = StepController::new(0);
        assert_eq!(controller.total(), 1);
        assert!(controller.is_terminal());
    }

    #[test]
    fn test_next_blocked_by_invalid_step() {
        let mut controller = StepController::new(3);
        let errors = controller.next(&steps(), &draft("")).unwrap_err();
        assert!(errors.contains("name"));
        assert_eq!(controller.current(), 1);
    }

    #[test]
    fn test_next_advances_by_one_and_clamps() {
        let mut controller = StepController::new(3);
        let steps = steps();
        assert_eq!(controller.next(&steps, &draft("Ada")), Ok(2));
        assert_eq!(controller.next(&steps, &draft("Ada")), Ok(3));
        assert_eq!(controller.next(&steps, &draft("Ada")), Ok(3));
        assert!(controller.is_terminal());
    }

    #[test]
    fn test_previous_ignores_validity() {
        let mut controller = StepController::new(3);
        controller.next(&steps(), &draft("Ada")).unwrap();
        controller.next(&steps(), &draft("Ada")).unwrap();
        // draft is now invalid for step 1, going back still works
        assert_eq!(controller.previous(), 2);
        assert_eq!(controller.previous(), 1);
        assert_eq!(controller.previous(), 1);
    }

    #[test]
    fn test_go_to_only_backwards() {
        let mut controller = StepController::new(3);
        controller.next(&steps(), &draft("Ada")).unwrap();
        assert!(!controller.go_to(3));
        assert_eq!(controller.current(), 2);
        assert!(controller.go_to(2));
        assert!(controller.go_to(1));
        assert_eq!(controller.current(), 1);
        assert!(!controller.go_to(0));
    }

    #[test]
    fn test_progress() {
        let mut controller = StepController::new(3);
        controller.next(&steps(), &draft("Ada")).unwrap();
        assert_eq!(
            controller.progress(),
            vec![StepStatus::Completed, StepStatus::Current, StepStatus::Upcoming]
        );
    }
}
