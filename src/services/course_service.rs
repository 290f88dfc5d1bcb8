//! Domain service for courses.

use crate::domain::{Course, UserId};
use crate::services::patch::double_option;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CourseError {
    #[error("Course not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for CourseError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CourseError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub color: Option<Option<String>>,
}

#[async_trait::async_trait]
pub trait CourseService: Send + Sync {
    async fn list_courses(&self, user: &UserId) -> Result<Vec<Course>, CourseError>;

    async fn create_course(
        &self,
        user: &UserId,
        request: CreateCourseRequest,
    ) -> Result<Course, CourseError>;

    async fn update_course(
        &self,
        user: &UserId,
        id: &str,
        request: UpdateCourseRequest,
    ) -> Result<Course, CourseError>;

    /// Deletes a course and every assignment filed under it.
    ///
    /// Top-level notes that pointed at the course or at one of the removed
    /// assignments keep their content but lose the association.
    async fn delete_course(&self, user: &UserId, id: &str) -> Result<(), CourseError>;
}
