//! `SeaORM` implementation of the `AssignmentService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::domain::{Assignment, AssignmentNote, Task, UserId, compute_progress};
use crate::services::assignment_service::{
    AssignmentError, AssignmentProgress, AssignmentService, CreateAssignmentNoteRequest,
    CreateAssignmentRequest, CreateTaskRequest, UpdateAssignmentNoteRequest,
    UpdateAssignmentRequest, UpdateTaskRequest,
};
use crate::services::patch::required_text;

pub struct SeaOrmAssignmentService {
    store: Store,
}

impl SeaOrmAssignmentService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn require_assignment(&self, user: &UserId, id: &str) -> Result<(), AssignmentError> {
        if self.store.assignments().exists(user, id).await? {
            Ok(())
        } else {
            Err(AssignmentError::NotFound)
        }
    }

    async fn require_course(&self, user: &UserId, course_id: &str) -> Result<(), AssignmentError> {
        if self.store.courses().exists(user, course_id).await? {
            Ok(())
        } else {
            Err(AssignmentError::CourseNotFound)
        }
    }
}

fn validation(message: String) -> AssignmentError {
    AssignmentError::Validation(message)
}

#[async_trait]
impl AssignmentService for SeaOrmAssignmentService {
    async fn list_assignments(&self, user: &UserId) -> Result<Vec<Assignment>, AssignmentError> {
        Ok(self.store.assignments().list(user).await?)
    }

    async fn create_assignment(
        &self,
        user: &UserId,
        mut request: CreateAssignmentRequest,
    ) -> Result<Assignment, AssignmentError> {
        request.title = required_text("title", &request.title).map_err(validation)?;
        request.deadline = required_text("deadline", &request.deadline).map_err(validation)?;
        if request.course_id.is_empty() {
            return Err(validation("courseId is required".to_string()));
        }

        self.require_course(user, &request.course_id).await?;

        Ok(self.store.assignments().create(user, &request).await?)
    }

    async fn update_assignment(
        &self,
        user: &UserId,
        id: &str,
        mut request: UpdateAssignmentRequest,
    ) -> Result<Assignment, AssignmentError> {
        if let Some(title) = request.title.as_deref() {
            request.title = Some(required_text("title", title).map_err(validation)?);
        }
        if let Some(deadline) = request.deadline.as_deref() {
            request.deadline = Some(required_text("deadline", deadline).map_err(validation)?);
        }

        self.require_assignment(user, id).await?;
        if let Some(course_id) = request.course_id.as_deref() {
            self.require_course(user, course_id).await?;
        }

        self.store
            .assignments()
            .update(user, id, request)
            .await?
            .ok_or(AssignmentError::NotFound)
    }

    async fn delete_assignment(&self, user: &UserId, id: &str) -> Result<(), AssignmentError> {
        if self.store.assignments().delete(user, id).await? {
            Ok(())
        } else {
            Err(AssignmentError::NotFound)
        }
    }

    async fn list_tasks(
        &self,
        user: &UserId,
        assignment_id: &str,
    ) -> Result<Vec<Task>, AssignmentError> {
        self.store
            .assignments()
            .list_tasks(user, assignment_id)
            .await?
            .ok_or(AssignmentError::NotFound)
    }

    async fn add_task(
        &self,
        user: &UserId,
        assignment_id: &str,
        mut request: CreateTaskRequest,
    ) -> Result<Task, AssignmentError> {
        request.headline = required_text("headline", &request.headline).map_err(validation)?;
        self.store
            .assignments()
            .add_task(user, assignment_id, &request)
            .await?
            .ok_or(AssignmentError::NotFound)
    }

    async fn update_task(
        &self,
        user: &UserId,
        assignment_id: &str,
        task_id: &str,
        mut request: UpdateTaskRequest,
    ) -> Result<Task, AssignmentError> {
        if let Some(headline) = request.headline.as_deref() {
            request.headline = Some(required_text("headline", headline).map_err(validation)?);
        }
        self.require_assignment(user, assignment_id).await?;

        self.store
            .assignments()
            .update_task(user, assignment_id, task_id, request)
            .await?
            .ok_or(AssignmentError::TaskNotFound)
    }

    async fn delete_task(
        &self,
        user: &UserId,
        assignment_id: &str,
        task_id: &str,
    ) -> Result<(), AssignmentError> {
        self.require_assignment(user, assignment_id).await?;

        if self
            .store
            .assignments()
            .delete_task(user, assignment_id, task_id)
            .await?
        {
            Ok(())
        } else {
            Err(AssignmentError::TaskNotFound)
        }
    }

    async fn list_notes(
        &self,
        user: &UserId,
        assignment_id: &str,
    ) -> Result<Vec<AssignmentNote>, AssignmentError> {
        self.store
            .assignments()
            .list_notes(user, assignment_id)
            .await?
            .ok_or(AssignmentError::NotFound)
    }

    async fn add_note(
        &self,
        user: &UserId,
        assignment_id: &str,
        mut request: CreateAssignmentNoteRequest,
    ) -> Result<AssignmentNote, AssignmentError> {
        request.headline = required_text("headline", &request.headline).map_err(validation)?;
        self.store
            .assignments()
            .add_note(user, assignment_id, &request)
            .await?
            .ok_or(AssignmentError::NotFound)
    }

    async fn update_note(
        &self,
        user: &UserId,
        assignment_id: &str,
        note_id: &str,
        mut request: UpdateAssignmentNoteRequest,
    ) -> Result<AssignmentNote, AssignmentError> {
        if let Some(headline) = request.headline.as_deref() {
            request.headline = Some(required_text("headline", headline).map_err(validation)?);
        }
        self.require_assignment(user, assignment_id).await?;

        self.store
            .assignments()
            .update_note(user, assignment_id, note_id, request)
            .await?
            .ok_or(AssignmentError::NoteNotFound)
    }

    async fn delete_note(
        &self,
        user: &UserId,
        assignment_id: &str,
        note_id: &str,
    ) -> Result<(), AssignmentError> {
        self.require_assignment(user, assignment_id).await?;

        if self
            .store
            .assignments()
            .delete_note(user, assignment_id, note_id)
            .await?
        {
            Ok(())
        } else {
            Err(AssignmentError::NoteNotFound)
        }
    }

    async fn get_progress(
        &self,
        user: &UserId,
        assignment_id: &str,
    ) -> Result<AssignmentProgress, AssignmentError> {
        let tasks = self.list_tasks(user, assignment_id).await?;
        Ok(AssignmentProgress {
            progress: compute_progress(&tasks),
        })
    }
}
