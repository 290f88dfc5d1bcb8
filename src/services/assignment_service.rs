//! Domain service for assignments and the tasks and notes they own.
//!
//! Every operation takes the caller's [`UserId`] explicitly. A record owned
//! by another user is reported exactly like a missing one, so callers cannot
//! probe for the existence of foreign ids.

use crate::domain::{Assignment, AssignmentNote, Difficulty, Task, TaskStatus, UserId};
use crate::services::patch::double_option;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors specific to assignment operations.
#[derive(Debug, Error)]
pub enum AssignmentError {
    #[error("Assignment not found")]
    NotFound,

    #[error("Course not found")]
    CourseNotFound,

    #[error("Task not found")]
    TaskNotFound,

    #[error("Note not found")]
    NoteNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for AssignmentError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AssignmentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub deadline: String,
    pub course_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub resources: Option<Vec<String>>,
    #[serde(default)]
    pub recurring: Option<String>,
}

/// Allowed fields of an assignment update. Unknown fields are rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub deadline: Option<String>,
    pub course_id: Option<String>,
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub tags: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub resources: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub recurring: Option<Option<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub headline: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTaskRequest {
    pub headline: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentNoteRequest {
    pub headline: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateAssignmentNoteRequest {
    pub headline: Option<String>,
    pub body: Option<String>,
}

/// Response body of the progress endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssignmentProgress {
    pub progress: u8,
}

/// Domain service trait for assignments.
#[async_trait::async_trait]
pub trait AssignmentService: Send + Sync {
    /// Lists the caller's assignments with their tasks and notes.
    async fn list_assignments(&self, user: &UserId) -> Result<Vec<Assignment>, AssignmentError>;

    /// Creates an assignment under one of the caller's courses.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::CourseNotFound`] if the course does not exist
    /// or belongs to someone else.
    async fn create_assignment(
        &self,
        user: &UserId,
        request: CreateAssignmentRequest,
    ) -> Result<Assignment, AssignmentError>;

    async fn update_assignment(
        &self,
        user: &UserId,
        id: &str,
        request: UpdateAssignmentRequest,
    ) -> Result<Assignment, AssignmentError>;

    /// Deletes an assignment together with its tasks and notes.
    async fn delete_assignment(&self, user: &UserId, id: &str) -> Result<(), AssignmentError>;

    async fn list_tasks(
        &self,
        user: &UserId,
        assignment_id: &str,
    ) -> Result<Vec<Task>, AssignmentError>;

    /// Appends a task to the end of the assignment's task list.
    async fn add_task(
        &self,
        user: &UserId,
        assignment_id: &str,
        request: CreateTaskRequest,
    ) -> Result<Task, AssignmentError>;

    async fn update_task(
        &self,
        user: &UserId,
        assignment_id: &str,
        task_id: &str,
        request: UpdateTaskRequest,
    ) -> Result<Task, AssignmentError>;

    async fn delete_task(
        &self,
        user: &UserId,
        assignment_id: &str,
        task_id: &str,
    ) -> Result<(), AssignmentError>;

    async fn list_notes(
        &self,
        user: &UserId,
        assignment_id: &str,
    ) -> Result<Vec<AssignmentNote>, AssignmentError>;

    async fn add_note(
        &self,
        user: &UserId,
        assignment_id: &str,
        request: CreateAssignmentNoteRequest,
    ) -> Result<AssignmentNote, AssignmentError>;

    async fn update_note(
        &self,
        user: &UserId,
        assignment_id: &str,
        note_id: &str,
        request: UpdateAssignmentNoteRequest,
    ) -> Result<AssignmentNote, AssignmentError>;

    async fn delete_note(
        &self,
        user: &UserId,
        assignment_id: &str,
        note_id: &str,
    ) -> Result<(), AssignmentError>;

    /// Share of the assignment's tasks that are done, recomputed on every call.
    async fn get_progress(
        &self,
        user: &UserId,
        assignment_id: &str,
    ) -> Result<AssignmentProgress, AssignmentError>;
}
