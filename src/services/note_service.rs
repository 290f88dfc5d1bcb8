//! Domain service for free-standing notes.

use crate::domain::{Note, UserId};
use crate::services::patch::double_option;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("Note not found")]
    NotFound,

    #[error("Course not found")]
    CourseNotFound,

    #[error("Assignment not found")]
    AssignmentNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for NoteError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for NoteError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub content: String,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub assignment_id: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub resources: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateNoteRequest {
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub course_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub assignment_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub tags: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub resources: Option<Option<Vec<String>>>,
}

#[async_trait::async_trait]
pub trait NoteService: Send + Sync {
    async fn list_notes(&self, user: &UserId) -> Result<Vec<Note>, NoteError>;

    /// Creates a note. Any linked course or assignment must belong to the caller.
    async fn create_note(&self, user: &UserId, request: CreateNoteRequest)
    -> Result<Note, NoteError>;

    /// Applies the given fields and stamps `updatedAt`.
    async fn update_note(
        &self,
        user: &UserId,
        id: &str,
        request: UpdateNoteRequest,
    ) -> Result<Note, NoteError>;

    async fn delete_note(&self, user: &UserId, id: &str) -> Result<(), NoteError>;
}
