//! `SeaORM` implementation of the `NoteService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::domain::{Note, UserId};
use crate::services::note_service::{
    CreateNoteRequest, NoteError, NoteService, UpdateNoteRequest,
};
use crate::services::patch::required_text;

pub struct SeaOrmNoteService {
    store: Store,
}

impl SeaOrmNoteService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn check_links(
        &self,
        user: &UserId,
        course_id: Option<&str>,
        assignment_id: Option<&str>,
    ) -> Result<(), NoteError> {
        if let Some(course_id) = course_id
            && !self.store.courses().exists(user, course_id).await?
        {
            return Err(NoteError::CourseNotFound);
        }

        if let Some(assignment_id) = assignment_id
            && !self.store.assignments().exists(user, assignment_id).await?
        {
            return Err(NoteError::AssignmentNotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl NoteService for SeaOrmNoteService {
    async fn list_notes(&self, user: &UserId) -> Result<Vec<Note>, NoteError> {
        Ok(self.store.notes().list(user).await?)
    }

    async fn create_note(
        &self,
        user: &UserId,
        mut request: CreateNoteRequest,
    ) -> Result<Note, NoteError> {
        if request.content.trim().is_empty() {
            return Err(NoteError::Validation("content is required".to_string()));
        }
        request.course_id = request.course_id.filter(|id| !id.is_empty());
        request.assignment_id = request.assignment_id.filter(|id| !id.is_empty());

        self.check_links(
            user,
            request.course_id.as_deref(),
            request.assignment_id.as_deref(),
        )
        .await?;

        Ok(self.store.notes().create(user, &request).await?)
    }

    async fn update_note(
        &self,
        user: &UserId,
        id: &str,
        mut request: UpdateNoteRequest,
    ) -> Result<Note, NoteError> {
        if let Some(content) = request.content.as_deref() {
            required_text("content", content).map_err(NoteError::Validation)?;
        }
        // An empty id clears the link, same as null
        request.course_id = request.course_id.map(|id| id.filter(|id| !id.is_empty()));
        request.assignment_id = request
            .assignment_id
            .map(|id| id.filter(|id| !id.is_empty()));

        self.check_links(
            user,
            request.course_id.as_ref().and_then(Option::as_deref),
            request.assignment_id.as_ref().and_then(Option::as_deref),
        )
        .await?;

        self.store
            .notes()
            .update(user, id, request)
            .await?
            .ok_or(NoteError::NotFound)
    }

    async fn delete_note(&self, user: &UserId, id: &str) -> Result<(), NoteError> {
        if self.store.notes().delete(user, id).await? {
            Ok(())
        } else {
            Err(NoteError::NotFound)
        }
    }
}
