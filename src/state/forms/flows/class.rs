//! Create Class wizard

use async_trait::async_trait;

use super::{non_negative, required_date, SubmitReceipt, WizardFlow, WizardKind};
use crate::api::{ApiClientTrait, ApiError};
use crate::state::forms::draft::FormDraft;
use crate::state::forms::field::FieldValue;
use crate::state::forms::schema::{FieldKind, FieldSpec, StepSpec};
use crate::state::forms::validator::Rule;
use crate::state::{LookupSource, NewClass};

const DEFAULT_CAPACITY: i64 = 30;
/// Largest class the platform schedules; well inside the `u32` request field
const MAX_CAPACITY: i64 = 10_000;

/// Four steps: basics, schedule & capacity, objectives, review
pub struct CreateClassFlow {
    steps: Vec<StepSpec>,
}

impl CreateClassFlow {
    pub fn new() -> Self {
        Self {
            steps: class_steps(),
        }
    }
}

impl Default for CreateClassFlow {
    fn default() -> Self {
        Self::new()
    }
}

fn class_steps() -> Vec<StepSpec> {
    vec![
        StepSpec::new("Basics", "Course, instructor and class name")
            .field(
                FieldSpec::new("courseId", "Course", FieldKind::Select(LookupSource::Courses))
                    .rule(Rule::Required),
            )
            .field(
                FieldSpec::new(
                    "instructorId",
                    "Instructor",
                    FieldKind::Select(LookupSource::Instructors),
                )
                .rule(Rule::Required),
            )
            .field(FieldSpec::new("className", "Class name", FieldKind::Text).rule(Rule::Required))
            .field(
                FieldSpec::new("description", "Description", FieldKind::Multiline)
                    .rule(Rule::Required),
            ),
        StepSpec::new("Schedule", "Dates, capacity and location")
            .field(
                FieldSpec::new("startDate", "Start date", FieldKind::Date)
                    .rule(Rule::Required)
                    .rule(Rule::Date),
            )
            .field(
                FieldSpec::new("endDate", "End date", FieldKind::Date)
                    .rule(Rule::Required)
                    .rule(Rule::Date)
                    .rule(Rule::NotBefore {
                        path: "startDate",
                        label: "the start date",
                    }),
            )
            .field(
                FieldSpec::new("capacity", "Capacity", FieldKind::Number)
                    .rule(Rule::Positive)
                    .rule(Rule::NoMoreThan(MAX_CAPACITY)),
            )
            .field(
                FieldSpec::new("maxEnrollments", "Max enrollments", FieldKind::Number)
                    .rule(Rule::Positive)
                    .rule(Rule::NoMoreThan(MAX_CAPACITY))
                    .rule(Rule::AtMost {
                        path: "capacity",
                        label: "capacity",
                    }),
            )
            .field(FieldSpec::new("location", "Location", FieldKind::Text))
            .field(FieldSpec::new("isOnline", "Online class", FieldKind::Flag)),
        StepSpec::new("Objectives", "What students will learn")
            .field(
                FieldSpec::new("objectives", "Objective", FieldKind::List)
                    .rule(Rule::ListRequired),
            )
            .field(FieldSpec::new("prerequisites", "Prerequisite", FieldKind::List)),
        StepSpec::new("Review", "Check the details and create the class"),
    ]
}

fn class_defaults() -> FormDraft {
    FormDraft::new()
        .with("courseId", FieldValue::text())
        .with("instructorId", FieldValue::text())
        .with("className", FieldValue::text())
        .with("description", FieldValue::text())
        .with("startDate", FieldValue::text())
        .with("endDate", FieldValue::text())
        .with("capacity", FieldValue::Number(DEFAULT_CAPACITY))
        .with("maxEnrollments", FieldValue::Number(DEFAULT_CAPACITY))
        .with("location", FieldValue::text())
        .with("isOnline", FieldValue::Flag(false))
        .with("objectives", FieldValue::list())
        .with("prerequisites", FieldValue::list())
}

/// Request body for a finished draft. Blank list entries are dropped here.
pub fn class_payload(draft: &FormDraft) -> Result<NewClass, ApiError> {
    Ok(NewClass {
        course_id: draft.text("courseId").to_string(),
        instructor_id: draft.text("instructorId").to_string(),
        class_name: draft.text("className").trim().to_string(),
        description: draft.text("description").trim().to_string(),
        start_date: required_date(draft, "startDate")?,
        end_date: required_date(draft, "endDate")?,
        capacity: non_negative(draft, "capacity")?,
        max_enrollments: non_negative(draft, "maxEnrollments")?,
        location: draft.text("location").trim().to_string(),
        is_online: draft.flag("isOnline"),
        objectives: draft.non_blank_entries("objectives"),
        prerequisites: draft.non_blank_entries("prerequisites"),
    })
}

#[async_trait]
impl WizardFlow for CreateClassFlow {
    fn kind(&self) -> WizardKind {
        WizardKind::CreateClass
    }

    fn title(&self) -> &'static str {
        "Create Class"
    }

    fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    fn seed(&self) -> FormDraft {
        class_defaults()
    }

    fn lookups(&self) -> Vec<LookupSource> {
        vec![LookupSource::Courses, LookupSource::Instructors]
    }

    fn submit_label(&self) -> &'static str {
        "Create class"
    }

    async fn submit(
        &self,
        api: &dyn ApiClientTrait,
        draft: &FormDraft,
    ) -> Result<SubmitReceipt, ApiError> {
        let payload = class_payload(draft)?;
        let class = api.create_class(&payload).await?;
        tracing::info!(class_id = %class.id, "class created");
        Ok(SubmitReceipt {
            entity_id: class.id,
            label: class.details.class_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApiClientTrait;
    use crate::state::Class;
    use crate::state::forms::validator::validate;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn filled() -> FormDraft {
        let mut draft = class_defaults();
        for (path, value) in [
            ("courseId", "c-101"),
            ("instructorId", "i-1"),
            ("className", " Intro "),
            ("description", "desc"),
            ("startDate", "2025-09-01"),
            ("endDate", "2025-12-15"),
        ] {
            draft.set(path, FieldValue::text_with_value(value)).unwrap();
        }
        draft
            .set(
                "objectives",
                FieldValue::List(vec!["".into(), "Learn X".into(), "  ".into()]),
            )
            .unwrap();
        draft
    }

    #[test]
    fn test_has_four_steps_ending_in_review() {
        let flow = CreateClassFlow::new();
        assert_eq!(flow.steps().len(), 4);
        assert!(flow.steps()[3].is_review());
    }

    #[test]
    fn test_step_fields_exist_in_defaults() {
        let flow = CreateClassFlow::new();
        let defaults = flow.seed();
        for step in flow.steps() {
            for field in &step.fields {
                assert!(defaults.get(field.path).is_some(), "{} missing", field.path);
            }
        }
    }

    #[test]
    fn test_schedule_rejects_oversized_capacity_inline() {
        let flow = CreateClassFlow::new();
        let mut draft = filled();
        draft.set("capacity", FieldValue::Number(5_000_000_000)).unwrap();
        draft
            .set("maxEnrollments", FieldValue::Number(5_000_000_000))
            .unwrap();

        let errors = validate(&flow.steps()[1], &draft);
        assert_eq!(
            errors.get("capacity"),
            Some("Capacity cannot be more than 10000")
        );
        assert_eq!(
            errors.get("maxEnrollments"),
            Some("Max enrollments cannot be more than 10000")
        );

        draft.set("capacity", FieldValue::Number(MAX_CAPACITY)).unwrap();
        draft.set("maxEnrollments", FieldValue::Number(MAX_CAPACITY)).unwrap();
        assert!(validate(&flow.steps()[1], &draft).is_empty());
        assert!(class_payload(&draft).is_ok());
    }

    #[test]
    fn test_payload_strips_blank_entries() {
        let payload = class_payload(&filled()).unwrap();
        assert_eq!(payload.objectives, vec!["Learn X".to_string()]);
        assert!(payload.prerequisites.is_empty());
        assert_eq!(payload.class_name, "Intro");
        assert_eq!(payload.capacity, 30);
        assert_eq!(
            payload.start_date,
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
        );
    }

    #[test]
    fn test_payload_rejects_bad_date() {
        let mut draft = filled();
        draft
            .set("endDate", FieldValue::text_with_value("soon"))
            .unwrap();
        assert!(matches!(class_payload(&draft), Err(ApiError::Payload(_))));
    }

    #[tokio::test]
    async fn test_submit_calls_create_class_once() {
        let mut api = MockApiClientTrait::new();
        api.expect_create_class()
            .withf(|p| p.course_id == "c-101" && p.objectives == vec!["Learn X".to_string()])
            .times(1)
            .returning(|p| {
                Ok(Class {
                    id: "cls-9".into(),
                    details: p.clone(),
                })
            });

        let receipt = CreateClassFlow::new().submit(&api, &filled()).await.unwrap();
        assert_eq!(
            receipt,
            SubmitReceipt {
                entity_id: "cls-9".into(),
                label: "Intro".into(),
            }
        );
    }
}
