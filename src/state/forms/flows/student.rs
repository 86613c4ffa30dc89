//! Create Student and Edit Student wizards
//!
//! Both share the same four steps. The edit flow opens with the student's
//! current values and sends only what changed.

use async_trait::async_trait;

use super::{optional_date, SubmitReceipt, WizardFlow, WizardKind};
use crate::api::{ApiClientTrait, ApiError};
use crate::state::forms::draft::FormDraft;
use crate::state::forms::field::FieldValue;
use crate::state::forms::schema::{FieldKind, FieldSpec, StepSpec};
use crate::state::forms::validator::Rule;
use crate::state::{Address, EmergencyContact, NewStudent, Student, StudentPatch};

fn student_steps() -> Vec<StepSpec> {
    vec![
        StepSpec::new("Personal", "Name and contact details")
            .field(FieldSpec::new("firstName", "First name", FieldKind::Text).rule(Rule::Required))
            .field(FieldSpec::new("lastName", "Last name", FieldKind::Text).rule(Rule::Required))
            .field(FieldSpec::new("email", "Email", FieldKind::Email).rule(Rule::Email))
            .field(FieldSpec::new("phone", "Phone", FieldKind::Phone).rule(Rule::Phone))
            .field(
                FieldSpec::new("dateOfBirth", "Date of birth", FieldKind::Date).rule(Rule::Date),
            ),
        StepSpec::new("Address", "Home address and emergency contact")
            .field(FieldSpec::new("address.street", "Street", FieldKind::Text).rule(Rule::Required))
            .field(FieldSpec::new("address.city", "City", FieldKind::Text).rule(Rule::Required))
            .field(FieldSpec::new("address.state", "State", FieldKind::Text).rule(Rule::Required))
            .field(
                FieldSpec::new("address.zipCode", "ZIP code", FieldKind::Text)
                    .rule(Rule::Required),
            )
            .field(
                FieldSpec::new("emergencyContact.name", "Contact name", FieldKind::Text)
                    .rule(Rule::Required),
            )
            .field(
                FieldSpec::new("emergencyContact.phone", "Contact phone", FieldKind::Phone)
                    .rule(Rule::Phone),
            )
            .field(
                FieldSpec::new(
                    "emergencyContact.relationship",
                    "Relationship",
                    FieldKind::Text,
                )
                .rule(Rule::Required),
            ),
        StepSpec::new("Enrollment", "Grade, enrollment date and notes")
            .field(
                FieldSpec::new("gradeLevel", "Grade level", FieldKind::Text).rule(Rule::Required),
            )
            .field(
                FieldSpec::new("enrollmentDate", "Enrollment date", FieldKind::Date)
                    .rule(Rule::Required)
                    .rule(Rule::Date),
            )
            .field(FieldSpec::new("tags", "Tag", FieldKind::List))
            .field(FieldSpec::new("notes", "Notes", FieldKind::Multiline))
            .field(FieldSpec::new("isActive", "Active", FieldKind::Flag)),
        StepSpec::new("Review", "Check the details before saving"),
    ]
}

fn text(value: &str) -> FieldValue {
    FieldValue::text_with_value(value)
}

fn date_text(date: Option<chrono::NaiveDate>) -> FieldValue {
    text(
        &date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    )
}

/// Draft holding `student`'s values. `NewStudent::default()` gives the blank form.
fn student_draft(student: &NewStudent) -> FormDraft {
    FormDraft::new()
        .with("firstName", text(&student.first_name))
        .with("lastName", text(&student.last_name))
        .with("email", text(&student.email))
        .with("phone", text(&student.phone))
        .with("dateOfBirth", date_text(student.date_of_birth))
        .with(
            "address",
            FieldValue::Group(
                FormDraft::new()
                    .with("street", text(&student.address.street))
                    .with("city", text(&student.address.city))
                    .with("state", text(&student.address.state))
                    .with("zipCode", text(&student.address.zip_code)),
            ),
        )
        .with(
            "emergencyContact",
            FieldValue::Group(
                FormDraft::new()
                    .with("name", text(&student.emergency_contact.name))
                    .with("phone", text(&student.emergency_contact.phone))
                    .with("relationship", text(&student.emergency_contact.relationship)),
            ),
        )
        .with("gradeLevel", text(&student.grade_level))
        .with("enrollmentDate", date_text(student.enrollment_date))
        .with("tags", FieldValue::list_with_values(student.tags.clone()))
        .with("notes", text(&student.notes))
        .with("isActive", FieldValue::Flag(student.is_active))
}

fn trimmed(draft: &FormDraft, path: &str) -> String {
    draft.text(path).trim().to_string()
}

/// Request body for a finished draft. Blank tags are dropped here.
pub fn student_payload(draft: &FormDraft) -> Result<NewStudent, ApiError> {
    Ok(NewStudent {
        first_name: trimmed(draft, "firstName"),
        last_name: trimmed(draft, "lastName"),
        email: trimmed(draft, "email"),
        phone: trimmed(draft, "phone"),
        date_of_birth: optional_date(draft, "dateOfBirth")?,
        address: Address {
            street: trimmed(draft, "address.street"),
            city: trimmed(draft, "address.city"),
            state: trimmed(draft, "address.state"),
            zip_code: trimmed(draft, "address.zipCode"),
        },
        emergency_contact: EmergencyContact {
            name: trimmed(draft, "emergencyContact.name"),
            phone: trimmed(draft, "emergencyContact.phone"),
            relationship: trimmed(draft, "emergencyContact.relationship"),
        },
        grade_level: trimmed(draft, "gradeLevel"),
        enrollment_date: optional_date(draft, "enrollmentDate")?,
        tags: draft.non_blank_entries("tags"),
        notes: draft.text("notes").trim_end().to_string(),
        is_active: draft.flag("isActive"),
    })
}

pub struct CreateStudentFlow {
    steps: Vec<StepSpec>,
}

impl CreateStudentFlow {
    pub fn new() -> Self {
        Self {
            steps: student_steps(),
        }
    }
}

impl Default for CreateStudentFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WizardFlow for CreateStudentFlow {
    fn kind(&self) -> WizardKind {
        WizardKind::CreateStudent
    }

    fn title(&self) -> &'static str {
        "Add Student"
    }

    fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    fn seed(&self) -> FormDraft {
        student_draft(&NewStudent {
            is_active: true,
            ..NewStudent::default()
        })
    }

    fn submit_label(&self) -> &'static str {
        "Add student"
    }

    async fn submit(
        &self,
        api: &dyn ApiClientTrait,
        draft: &FormDraft,
    ) -> Result<SubmitReceipt, ApiError> {
        let payload = student_payload(draft)?;
        let student = api.create_student(&payload).await?;
        tracing::info!(student_id = %student.id, "student created");
        Ok(SubmitReceipt {
            label: student.display_name(),
            entity_id: student.id,
        })
    }
}

/// Edit an existing student
pub struct EditStudentFlow {
    steps: Vec<StepSpec>,
    student: Student,
}

impl EditStudentFlow {
    pub fn new(student: Student) -> Self {
        Self {
            steps: student_steps(),
            student,
        }
    }
}

#[async_trait]
impl WizardFlow for EditStudentFlow {
    fn kind(&self) -> WizardKind {
        WizardKind::EditStudent
    }

    fn title(&self) -> &'static str {
        "Edit Student"
    }

    fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    fn seed(&self) -> FormDraft {
        student_draft(&self.student.details)
    }

    fn submit_label(&self) -> &'static str {
        "Save changes"
    }

    async fn submit(
        &self,
        api: &dyn ApiClientTrait,
        draft: &FormDraft,
    ) -> Result<SubmitReceipt, ApiError> {
        // compare against the seeded draft, not the raw record, so that
        // normalisation (trimming, blank tags) does not show up as a change
        let before = student_payload(&self.seed())?;
        let after = student_payload(draft)?;
        let patch = StudentPatch::between(&before, &after);
        tracing::debug!(student_id = %self.student.id, ?patch, "updating student");

        let student = api.update_student(&self.student.id, &patch).await?;
        Ok(SubmitReceipt {
            label: student.display_name(),
            entity_id: student.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApiClientTrait;
    use pretty_assertions::assert_eq;

    fn existing() -> Student {
        Student {
            id: "s-1".into(),
            details: NewStudent {
                first_name: "Amara".into(),
                last_name: "Okafor".into(),
                email: "amara@example.edu".into(),
                phone: "+234 803 555 0101".into(),
                date_of_birth: chrono::NaiveDate::from_ymd_opt(2009, 3, 14),
                address: Address {
                    street: "12 Marina Road".into(),
                    city: "Lagos".into(),
                    state: "LA".into(),
                    zip_code: "100001".into(),
                },
                emergency_contact: EmergencyContact {
                    name: "Chidi Okafor".into(),
                    phone: "+234 803 555 0199".into(),
                    relationship: "Father".into(),
                },
                grade_level: "10".into(),
                enrollment_date: chrono::NaiveDate::from_ymd_opt(2024, 9, 2),
                tags: vec!["scholarship".into()],
                notes: String::new(),
                is_active: true,
            },
        }
    }

    #[test]
    fn test_create_seed_is_blank_and_active() {
        let draft = CreateStudentFlow::new().seed();
        assert_eq!(draft.text("firstName"), "");
        assert_eq!(draft.text("address.city"), "");
        assert_eq!(draft.list("tags"), &[String::new()]);
        assert!(draft.flag("isActive"));
    }

    #[test]
    fn test_edit_seed_uses_student_values() {
        let draft = EditStudentFlow::new(existing()).seed();
        assert_eq!(draft.text("firstName"), "Amara");
        assert_eq!(draft.text("address.zipCode"), "100001");
        assert_eq!(draft.text("emergencyContact.relationship"), "Father");
        assert_eq!(draft.text("dateOfBirth"), "2009-03-14");
        assert_eq!(draft.list("tags"), &["scholarship".to_string()]);
    }

    #[test]
    fn test_step_fields_exist_in_seeds() {
        let create = CreateStudentFlow::new();
        let edit = EditStudentFlow::new(existing());
        for (flow, seed) in [
            (&create as &dyn WizardFlow, create.seed()),
            (&edit as &dyn WizardFlow, edit.seed()),
        ] {
            for step in flow.steps() {
                for field in &step.fields {
                    assert!(seed.get(field.path).is_some(), "{} missing", field.path);
                }
            }
        }
    }

    #[test]
    fn test_create_and_edit_share_shape() {
        let blank = CreateStudentFlow::new().seed();
        let seeded = EditStudentFlow::new(existing()).seed();
        assert_eq!(blank.paths(), seeded.paths());
    }

    #[test]
    fn test_seed_payload_round_trip() {
        let student = existing();
        let payload = student_payload(&EditStudentFlow::new(student.clone()).seed()).unwrap();
        assert_eq!(payload, student.details);
    }

    #[tokio::test]
    async fn test_edit_sends_only_changes() {
        let flow = EditStudentFlow::new(existing());
        let mut draft = flow.seed();
        draft
            .set("address.city", FieldValue::text_with_value("Abuja"))
            .unwrap();

        let mut api = MockApiClientTrait::new();
        api.expect_update_student()
            .withf(|id, patch| {
                id == "s-1"
                    && patch.address.as_ref().map(|a| a.city.as_str()) == Some("Abuja")
                    && patch.email.is_none()
                    && patch.first_name.is_none()
            })
            .times(1)
            .returning(|id, patch| {
                let mut student = existing();
                student.id = id.to_string();
                patch.apply_to(&mut student.details);
                Ok(student)
            });

        let receipt = flow.submit(&api, &draft).await.unwrap();
        assert_eq!(receipt.entity_id, "s-1");
        assert_eq!(receipt.label, "Amara Okafor");
    }

    #[tokio::test]
    async fn test_create_calls_create_student() {
        let flow = CreateStudentFlow::new();
        let mut draft = flow.seed();
        draft
            .set("firstName", FieldValue::text_with_value("Ada"))
            .unwrap();
        draft
            .set("lastName", FieldValue::text_with_value("Obi"))
            .unwrap();

        let mut api = MockApiClientTrait::new();
        api.expect_create_student()
            .withf(|p| p.first_name == "Ada" && p.tags.is_empty())
            .times(1)
            .returning(|p| {
                Ok(Student {
                    id: "s-2".into(),
                    details: p.clone(),
                })
            });

        let receipt = flow.submit(&api, &draft).await.unwrap();
        assert_eq!(receipt.label, "Ada Obi");
    }
}
