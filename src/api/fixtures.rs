//! In-memory stand-in for the platform API
//!
//! Only used when fixtures are switched on in the config (or with
//! `EDU_ADMIN_FIXTURES=1`); the status bar says so while it is active.
//! Never used as a fallback when the real API fails.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::error::ApiError;
use super::traits::ApiClientTrait;
use crate::state::{
    Address, Class, EmergencyContact, LookupOption, NewClass, NewStudent, Student, StudentPatch,
};

pub struct FixtureClient {
    courses: Vec<LookupOption>,
    instructors: Vec<LookupOption>,
    students: Mutex<Vec<Student>>,
    classes: Mutex<Vec<Class>>,
    /// Artificial delay so the submitting state is visible
    latency: Duration,
}

impl FixtureClient {
    pub fn new(latency: Duration) -> Self {
        Self {
            courses: vec![
                LookupOption::new("c-101", "MATH101 · Algebra I"),
                LookupOption::new("c-205", "PHYS205 · Mechanics"),
                LookupOption::new("c-310", "CS310 · Data Structures"),
            ],
            instructors: vec![
                LookupOption::new("i-1", "Grace Hopper"),
                LookupOption::new("i-2", "Alan Turing"),
            ],
            students: Mutex::new(seed_students()),
            classes: Mutex::new(Vec::new()),
            latency,
        }
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn seed_students() -> Vec<Student> {
    vec![Student {
        id: "s-1".to_string(),
        details: NewStudent {
            first_name: "Amara".to_string(),
            last_name: "Okafor".to_string(),
            email: "amara.okafor@example.edu".to_string(),
            phone: "+234 803 555 0101".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2009, 3, 14),
            address: Address {
                street: "12 Marina Road".to_string(),
                city: "Lagos".to_string(),
                state: "LA".to_string(),
                zip_code: "100001".to_string(),
            },
            emergency_contact: EmergencyContact {
                name: "Chidi Okafor".to_string(),
                phone: "+234 803 555 0199".to_string(),
                relationship: "Father".to_string(),
            },
            grade_level: "10".to_string(),
            enrollment_date: NaiveDate::from_ymd_opt(2024, 9, 2),
            tags: vec!["scholarship".to_string()],
            notes: String::new(),
            is_active: true,
        },
    }]
}

fn check_unique(
    students: &[Student],
    skip_id: Option<&str>,
    email: &str,
    phone: &str,
) -> Result<(), ApiError> {
    let others = students.iter().filter(|s| Some(s.id.as_str()) != skip_id);
    for other in others {
        if other.details.email.eq_ignore_ascii_case(email) {
            return Err(ApiError::rejected_with_code(
                "duplicate_email",
                format!("email {email} already in use"),
            ));
        }
        if !phone.is_empty() && other.details.phone == phone {
            return Err(ApiError::rejected_with_code(
                "duplicate_phone",
                format!("phone {phone} already in use"),
            ));
        }
    }
    Ok(())
}

#[async_trait]
impl ApiClientTrait for FixtureClient {
    async fn list_courses(&self) -> Result<Vec<LookupOption>, ApiError> {
        self.pause().await;
        Ok(self.courses.clone())
    }

    async fn list_instructors(&self) -> Result<Vec<LookupOption>, ApiError> {
        self.pause().await;
        Ok(self.instructors.clone())
    }

    async fn list_students(&self) -> Result<Vec<Student>, ApiError> {
        self.pause().await;
        Ok(self.students.lock().await.clone())
    }

    async fn create_class(&self, payload: &NewClass) -> Result<Class, ApiError> {
        self.pause().await;
        if !self.courses.iter().any(|c| c.id == payload.course_id) {
            return Err(ApiError::rejected_with_code(
                "validation_failed",
                format!("unknown course {}", payload.course_id),
            ));
        }
        let class = Class {
            id: Uuid::new_v4().to_string(),
            details: payload.clone(),
        };
        self.classes.lock().await.push(class.clone());
        Ok(class)
    }

    async fn create_student(&self, payload: &NewStudent) -> Result<Student, ApiError> {
        self.pause().await;
        let mut students = self.students.lock().await;
        check_unique(&students, None, &payload.email, &payload.phone)?;
        let student = Student {
            id: Uuid::new_v4().to_string(),
            details: payload.clone(),
        };
        students.push(student.clone());
        Ok(student)
    }

    async fn update_student(&self, id: &str, patch: &StudentPatch) -> Result<Student, ApiError> {
        self.pause().await;
        let mut students = self.students.lock().await;
        let index = students
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| ApiError::rejected(format!("student {id} not found")))?;

        let mut updated = students[index].details.clone();
        patch.apply_to(&mut updated);
        check_unique(&students, Some(id), &updated.email, &updated.phone)?;

        students[index].details = updated;
        Ok(students[index].clone())
    }
}
