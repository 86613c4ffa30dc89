//! Platform entities and request payloads
//!
//! Courses, instructors, students and classes belong to the platform API.
//! The console only reads them, or embeds their ids in a request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Dropdown data source preloaded when a wizard opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupSource {
    Courses,
    Instructors,
}

impl LookupSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Courses => "courses",
            Self::Instructors => "instructors",
        }
    }
}

/// One selectable entry of a dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupOption {
    pub id: String,
    pub label: String,
}

impl LookupOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relationship: String,
}

/// Student record as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    #[serde(flatten)]
    pub details: NewStudent,
}

impl Student {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.details.first_name, self.details.last_name)
    }
}

/// Body of a create-student request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Address,
    pub emergency_contact: EmergencyContact,
    pub grade_level: String,
    pub enrollment_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Partial update of a student. Only the fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// `Some(None)` clears the date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

fn changed<T: PartialEq + Clone>(before: &T, after: &T) -> Option<T> {
    (before != after).then(|| after.clone())
}

impl StudentPatch {
    /// Patch holding exactly the fields that differ between `before` and `after`
    pub fn between(before: &NewStudent, after: &NewStudent) -> Self {
        Self {
            first_name: changed(&before.first_name, &after.first_name),
            last_name: changed(&before.last_name, &after.last_name),
            email: changed(&before.email, &after.email),
            phone: changed(&before.phone, &after.phone),
            date_of_birth: changed(&before.date_of_birth, &after.date_of_birth),
            address: changed(&before.address, &after.address),
            emergency_contact: changed(&before.emergency_contact, &after.emergency_contact),
            grade_level: changed(&before.grade_level, &after.grade_level),
            enrollment_date: changed(&before.enrollment_date, &after.enrollment_date),
            tags: changed(&before.tags, &after.tags),
            notes: changed(&before.notes, &after.notes),
            is_active: changed(&before.is_active, &after.is_active),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to a full record
    pub fn apply_to(&self, target: &mut NewStudent) {
        if let Some(v) = &self.first_name {
            target.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            target.last_name = v.clone();
        }
        if let Some(v) = &self.email {
            target.email = v.clone();
        }
        if let Some(v) = &self.phone {
            target.phone = v.clone();
        }
        if let Some(v) = self.date_of_birth {
            target.date_of_birth = v;
        }
        if let Some(v) = &self.address {
            target.address = v.clone();
        }
        if let Some(v) = &self.emergency_contact {
            target.emergency_contact = v.clone();
        }
        if let Some(v) = &self.grade_level {
            target.grade_level = v.clone();
        }
        if let Some(v) = self.enrollment_date {
            target.enrollment_date = v;
        }
        if let Some(v) = &self.tags {
            target.tags = v.clone();
        }
        if let Some(v) = &self.notes {
            target.notes = v.clone();
        }
        if let Some(v) = self.is_active {
            target.is_active = v;
        }
    }
}

/// Body of a create-class request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClass {
    pub course_id: String,
    pub instructor_id: String,
    pub class_name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub capacity: u32,
    pub max_enrollments: u32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

/// Class record as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    #[serde(flatten)]
    pub details: NewClass,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn student() -> NewStudent {
        NewStudent {
            first_name: "Ada".into(),
            last_name: "Obi".into(),
            email: "ada@school.edu".into(),
            phone: "+234 803 555 0101".into(),
            grade_level: "10".into(),
            is_active: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_patch_between_identical_is_empty() {
        assert!(StudentPatch::between(&student(), &student()).is_empty());
    }

    #[test]
    fn test_patch_only_carries_changes() {
        let mut after = student();
        after.email = "ada.obi@school.edu".into();
        after.address.city = "Lagos".into();
        let patch = StudentPatch::between(&student(), &after);
        assert_eq!(patch.email.as_deref(), Some("ada.obi@school.edu"));
        assert_eq!(patch.address.as_ref().map(|a| a.city.as_str()), Some("Lagos"));
        assert!(patch.first_name.is_none());
        assert!(patch.phone.is_none());
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = StudentPatch {
            last_name: Some("Okafor".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "lastName": "Okafor" }));
    }

    #[test]
    fn test_patch_clearing_a_date() {
        let mut before = student();
        before.date_of_birth = NaiveDate::from_ymd_opt(2010, 5, 1);
        let patch = StudentPatch::between(&before, &student());
        assert_eq!(patch.date_of_birth, Some(None));
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "dateOfBirth": null }));
    }

    #[test]
    fn test_apply_round_trips_between() {
        let mut after = student();
        after.tags = vec!["honors".into()];
        after.is_active = false;
        let patch = StudentPatch::between(&student(), &after);
        let mut target = student();
        patch.apply_to(&mut target);
        assert_eq!(target, after);
    }

    #[test]
    fn test_student_wire_shape_is_flat_camel_case() {
        let json = serde_json::json!({
            "id": "s-1",
            "firstName": "Ada",
            "lastName": "Obi",
            "email": "ada@school.edu",
            "phone": "5551234",
            "dateOfBirth": "2010-05-01",
            "address": { "street": "", "city": "Lagos", "state": "", "zipCode": "" },
            "emergencyContact": { "name": "", "phone": "", "relationship": "" },
            "gradeLevel": "10",
            "enrollmentDate": null
        });
        let parsed: Student = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.id, "s-1");
        assert_eq!(parsed.display_name(), "Ada Obi");
        assert_eq!(parsed.details.address.city, "Lagos");
        assert!(parsed.details.is_active);
        assert!(parsed.details.tags.is_empty());
    }
}
