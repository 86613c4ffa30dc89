//! Trait abstraction for the platform API to enable mocking in tests

use crate::state::{Class, LookupOption, NewClass, NewStudent, Student, StudentPatch};
use async_trait::async_trait;

use super::error::ApiError;

/// Operations the console needs from the platform API.
///
/// Implementations hold no per-call state and may be shared across tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiClientTrait: Send + Sync {
    /// Courses for the class wizard dropdown
    async fn list_courses(&self) -> Result<Vec<LookupOption>, ApiError>;

    /// Instructors for the class wizard dropdown
    async fn list_instructors(&self) -> Result<Vec<LookupOption>, ApiError>;

    /// All students, for the edit list
    async fn list_students(&self) -> Result<Vec<Student>, ApiError>;

    /// Create a class
    async fn create_class(&self, payload: &NewClass) -> Result<Class, ApiError>;

    /// Create a student
    async fn create_student(&self, payload: &NewStudent) -> Result<Student, ApiError>;

    /// Update an existing student with the fields present in `patch`
    async fn update_student(&self, id: &str, patch: &StudentPatch) -> Result<Student, ApiError>;
}
