use std::collections::HashMap;

use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use tracing::info;

use super::{decode_list, encode_list};
use crate::domain::{Assignment, AssignmentNote, Task, UserId, new_id, now_timestamp};
use crate::entities::{assignment_notes, assignment_tasks, assignments, notes, prelude::*};
use crate::services::assignment_service::{
    CreateAssignmentNoteRequest, CreateAssignmentRequest, CreateTaskRequest,
    UpdateAssignmentNoteRequest, UpdateAssignmentRequest, UpdateTaskRequest,
};

/// Repository for the assignment aggregate: assignment rows plus their
/// nested tasks and notes.
///
/// Every query is filtered by the owning user in the same statement as the id.
pub struct AssignmentRepository {
    conn: DatabaseConnection,
}

impl AssignmentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Model Conversion Helpers
    // ========================================================================

    fn map_task(model: assignment_tasks::Model) -> Task {
        Task {
            id: model.id,
            headline: model.headline,
            description: model.description,
            difficulty: model.difficulty.parse().unwrap_or_default(),
            status: model.status.parse().unwrap_or_default(),
            user_id: UserId::from(model.user_id),
        }
    }

    fn map_note(model: assignment_notes::Model) -> AssignmentNote {
        AssignmentNote {
            id: model.id,
            headline: model.headline,
            body: model.body,
            user_id: UserId::from(model.user_id),
        }
    }

    fn map_assignment(
        model: assignments::Model,
        tasks: Vec<Task>,
        notes: Vec<AssignmentNote>,
    ) -> Assignment {
        Assignment {
            id: model.id,
            title: model.title,
            description: model.description,
            deadline: model.deadline,
            course_id: model.course_id,
            completed: model.completed,
            tags: decode_list(model.tags),
            resources: decode_list(model.resources),
            recurring: model.recurring,
            user_id: UserId::from(model.user_id),
            tasks,
            notes,
            created_at: Some(model.created_at),
            updated_at: Some(model.updated_at),
        }
    }

    async fn find_model(&self, user: &UserId, id: &str) -> Result<Option<assignments::Model>> {
        Self::find_owned(&self.conn, user, id).await
    }

    async fn find_owned<C: ConnectionTrait>(
        conn: &C,
        user: &UserId,
        id: &str,
    ) -> Result<Option<assignments::Model>> {
        Assignments::find()
            .filter(assignments::Column::Id.eq(id))
            .filter(assignments::Column::UserId.eq(user.as_str()))
            .one(conn)
            .await
            .context("Failed to query assignment")
    }

    /// Loads tasks and notes for a batch of assignments, grouped by parent id.
    async fn load_children(
        &self,
        ids: &[String],
    ) -> Result<(
        HashMap<String, Vec<Task>>,
        HashMap<String, Vec<AssignmentNote>>,
    )> {
        let mut tasks: HashMap<String, Vec<Task>> = HashMap::new();
        let mut notes: HashMap<String, Vec<AssignmentNote>> = HashMap::new();

        if ids.is_empty() {
            return Ok((tasks, notes));
        }

        let task_rows = AssignmentTasks::find()
            .filter(assignment_tasks::Column::AssignmentId.is_in(ids.iter().cloned()))
            .order_by_asc(assignment_tasks::Column::Position)
            .all(&self.conn)
            .await
            .context("Failed to query assignment tasks")?;

        for row in task_rows {
            tasks
                .entry(row.assignment_id.clone())
                .or_default()
                .push(Self::map_task(row));
        }

        let note_rows = AssignmentNotes::find()
            .filter(assignment_notes::Column::AssignmentId.is_in(ids.iter().cloned()))
            .order_by_asc(assignment_notes::Column::Position)
            .all(&self.conn)
            .await
            .context("Failed to query assignment notes")?;

        for row in note_rows {
            notes
                .entry(row.assignment_id.clone())
                .or_default()
                .push(Self::map_note(row));
        }

        Ok((tasks, notes))
    }

    async fn assemble(&self, models: Vec<assignments::Model>) -> Result<Vec<Assignment>> {
        let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
        let (mut tasks, mut notes) = self.load_children(&ids).await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let t = tasks.remove(&m.id).unwrap_or_default();
                let n = notes.remove(&m.id).unwrap_or_default();
                Self::map_assignment(m, t, n)
            })
            .collect())
    }

    async fn touch<C: ConnectionTrait>(conn: &C, assignment_id: &str) -> Result<()> {
        Assignments::update_many()
            .col_expr(
                assignments::Column::UpdatedAt,
                Expr::value(now_timestamp()),
            )
            .filter(assignments::Column::Id.eq(assignment_id))
            .exec(conn)
            .await?;
        Ok(())
    }

    // ========================================================================
    // Assignment Operations
    // ========================================================================

    pub async fn list(&self, user: &UserId) -> Result<Vec<Assignment>> {
        let models = Assignments::find()
            .filter(assignments::Column::UserId.eq(user.as_str()))
            .order_by_asc(assignments::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list assignments")?;

        self.assemble(models).await
    }

    /// Every assignment of every user. Used by export only.
    pub async fn list_all(&self) -> Result<Vec<Assignment>> {
        let models = Assignments::find()
            .order_by_asc(assignments::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list assignments")?;

        self.assemble(models).await
    }

    pub async fn get(&self, user: &UserId, id: &str) -> Result<Option<Assignment>> {
        let Some(model) = self.find_model(user, id).await? else {
            return Ok(None);
        };

        Ok(self.assemble(vec![model]).await?.pop())
    }

    pub async fn exists(&self, user: &UserId, id: &str) -> Result<bool> {
        Ok(self.find_model(user, id).await?.is_some())
    }

    pub async fn create(
        &self,
        user: &UserId,
        request: &CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = now_timestamp();

        let active_model = assignments::ActiveModel {
            id: Set(new_id()),
            user_id: Set(user.to_string()),
            course_id: Set(request.course_id.clone()),
            title: Set(request.title.clone()),
            description: Set(request.description.clone()),
            deadline: Set(request.deadline.clone()),
            completed: Set(false),
            tags: Set(encode_list(request.tags.as_ref())),
            resources: Set(encode_list(request.resources.as_ref())),
            recurring: Set(request.recurring.clone()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert assignment")?;

        info!("Created assignment {} for user {}", model.id, user);
        Ok(Self::map_assignment(model, Vec::new(), Vec::new()))
    }

    pub async fn update(
        &self,
        user: &UserId,
        id: &str,
        request: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        let Some(model) = self.find_model(user, id).await? else {
            return Ok(None);
        };

        let mut active: assignments::ActiveModel = model.into();

        if let Some(title) = request.title {
            active.title = Set(title);
        }
        if let Some(description) = request.description {
            active.description = Set(description);
        }
        if let Some(deadline) = request.deadline {
            active.deadline = Set(deadline);
        }
        if let Some(course_id) = request.course_id {
            active.course_id = Set(course_id);
        }
        if let Some(completed) = request.completed {
            active.completed = Set(completed);
        }
        if let Some(tags) = request.tags {
            active.tags = Set(encode_list(tags.as_ref()));
        }
        if let Some(resources) = request.resources {
            active.resources = Set(encode_list(resources.as_ref()));
        }
        if let Some(recurring) = request.recurring {
            active.recurring = Set(recurring);
        }
        active.updated_at = Set(now_timestamp());

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update assignment")?;

        Ok(self.assemble(vec![updated]).await?.pop())
    }

    /// Removes an assignment with its tasks and notes in one transaction.
    ///
    /// Top-level notes linked to it keep their content but lose the link.
    pub async fn delete(&self, user: &UserId, id: &str) -> Result<bool> {
        let txn = self.conn.begin().await?;

        if Self::find_owned(&txn, user, id).await?.is_none() {
            txn.rollback().await?;
            return Ok(false);
        }

        Self::delete_children(&txn, &[id.to_string()]).await?;
        Assignments::delete_many()
            .filter(assignments::Column::Id.eq(id))
            .filter(assignments::Column::UserId.eq(user.as_str()))
            .exec(&txn)
            .await?;

        Notes::update_many()
            .col_expr(notes::Column::AssignmentId, Expr::value(Option::<String>::None))
            .filter(notes::Column::UserId.eq(user.as_str()))
            .filter(notes::Column::AssignmentId.eq(id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        info!("Deleted assignment {} for user {}", id, user);
        Ok(true)
    }

    pub(crate) async fn delete_children<C: ConnectionTrait>(
        conn: &C,
        assignment_ids: &[String],
    ) -> Result<()> {
        if assignment_ids.is_empty() {
            return Ok(());
        }

        AssignmentTasks::delete_many()
            .filter(assignment_tasks::Column::AssignmentId.is_in(assignment_ids.iter().cloned()))
            .exec(conn)
            .await?;
        AssignmentNotes::delete_many()
            .filter(assignment_notes::Column::AssignmentId.is_in(assignment_ids.iter().cloned()))
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Inserts a complete assignment (children included) unless its id is taken.
    ///
    /// Returns `false` when the id already exists.
    pub async fn insert_record(&self, record: &Assignment) -> Result<bool> {
        if Assignments::find_by_id(record.id.clone())
            .one(&self.conn)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        let now = now_timestamp();
        let txn = self.conn.begin().await?;

        assignments::ActiveModel {
            id: Set(record.id.clone()),
            user_id: Set(record.user_id.to_string()),
            course_id: Set(record.course_id.clone()),
            title: Set(record.title.clone()),
            description: Set(record.description.clone()),
            deadline: Set(record.deadline.clone()),
            completed: Set(record.completed),
            tags: Set(encode_list(record.tags.as_ref())),
            resources: Set(encode_list(record.resources.as_ref())),
            recurring: Set(record.recurring.clone()),
            created_at: Set(record.created_at.clone().unwrap_or_else(|| now.clone())),
            updated_at: Set(record.updated_at.clone().unwrap_or(now)),
        }
        .insert(&txn)
        .await
        .context("Failed to insert assignment record")?;

        for (position, task) in (0i32..).zip(&record.tasks) {
            assignment_tasks::ActiveModel {
                assignment_id: Set(record.id.clone()),
                id: Set(task.id.clone()),
                user_id: Set(task.user_id.to_string()),
                position: Set(position),
                headline: Set(task.headline.clone()),
                description: Set(task.description.clone()),
                difficulty: Set(task.difficulty.as_str().to_string()),
                status: Set(task.status.as_str().to_string()),
            }
            .insert(&txn)
            .await
            .context("Failed to insert task record")?;
        }

        for (position, note) in (0i32..).zip(&record.notes) {
            assignment_notes::ActiveModel {
                assignment_id: Set(record.id.clone()),
                id: Set(note.id.clone()),
                user_id: Set(note.user_id.to_string()),
                position: Set(position),
                headline: Set(note.headline.clone()),
                body: Set(note.body.clone()),
            }
            .insert(&txn)
            .await
            .context("Failed to insert assignment note record")?;
        }

        txn.commit().await?;
        Ok(true)
    }

    // ========================================================================
    // Task Operations
    // ========================================================================

    async fn find_task(
        &self,
        user: &UserId,
        assignment_id: &str,
        task_id: &str,
    ) -> Result<Option<assignment_tasks::Model>> {
        AssignmentTasks::find()
            .filter(assignment_tasks::Column::AssignmentId.eq(assignment_id))
            .filter(assignment_tasks::Column::Id.eq(task_id))
            .filter(assignment_tasks::Column::UserId.eq(user.as_str()))
            .one(&self.conn)
            .await
            .context("Failed to query task")
    }

    /// Tasks of an owned assignment in list order, `None` if the assignment is not visible.
    pub async fn list_tasks(&self, user: &UserId, assignment_id: &str) -> Result<Option<Vec<Task>>> {
        if !self.exists(user, assignment_id).await? {
            return Ok(None);
        }

        let rows = AssignmentTasks::find()
            .filter(assignment_tasks::Column::AssignmentId.eq(assignment_id))
            .filter(assignment_tasks::Column::UserId.eq(user.as_str()))
            .order_by_asc(assignment_tasks::Column::Position)
            .all(&self.conn)
            .await
            .context("Failed to list tasks")?;

        Ok(Some(rows.into_iter().map(Self::map_task).collect()))
    }

    /// Appends a task, `None` if the assignment is not visible to `user`.
    pub async fn add_task(
        &self,
        user: &UserId,
        assignment_id: &str,
        request: &CreateTaskRequest,
    ) -> Result<Option<Task>> {
        let txn = self.conn.begin().await?;

        if Self::find_owned(&txn, user, assignment_id).await?.is_none() {
            txn.rollback().await?;
            return Ok(None);
        }

        let position = AssignmentTasks::find()
            .filter(assignment_tasks::Column::AssignmentId.eq(assignment_id))
            .order_by_desc(assignment_tasks::Column::Position)
            .one(&txn)
            .await?
            .map_or(0, |last| last.position + 1);

        let model = assignment_tasks::ActiveModel {
            assignment_id: Set(assignment_id.to_string()),
            id: Set(new_id()),
            user_id: Set(user.to_string()),
            position: Set(position),
            headline: Set(request.headline.clone()),
            description: Set(request.description.clone()),
            difficulty: Set(request.difficulty.as_str().to_string()),
            status: Set(request.status.as_str().to_string()),
        }
        .insert(&txn)
        .await
        .context("Failed to insert task")?;

        Self::touch(&txn, assignment_id).await?;
        txn.commit().await?;

        Ok(Some(Self::map_task(model)))
    }

    pub async fn update_task(
        &self,
        user: &UserId,
        assignment_id: &str,
        task_id: &str,
        request: UpdateTaskRequest,
    ) -> Result<Option<Task>> {
        let Some(model) = self.find_task(user, assignment_id, task_id).await? else {
            return Ok(None);
        };

        let mut active: assignment_tasks::ActiveModel = model.into();
        if let Some(headline) = request.headline {
            active.headline = Set(headline);
        }
        if let Some(description) = request.description {
            active.description = Set(description);
        }
        if let Some(difficulty) = request.difficulty {
            active.difficulty = Set(difficulty.as_str().to_string());
        }
        if let Some(status) = request.status {
            active.status = Set(status.as_str().to_string());
        }

        let txn = self.conn.begin().await?;
        let updated = active
            .update(&txn)
            .await
            .context("Failed to update task")?;
        Self::touch(&txn, assignment_id).await?;
        txn.commit().await?;

        Ok(Some(Self::map_task(updated)))
    }

    pub async fn delete_task(
        &self,
        user: &UserId,
        assignment_id: &str,
        task_id: &str,
    ) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let result = AssignmentTasks::delete_many()
            .filter(assignment_tasks::Column::AssignmentId.eq(assignment_id))
            .filter(assignment_tasks::Column::Id.eq(task_id))
            .filter(assignment_tasks::Column::UserId.eq(user.as_str()))
            .exec(&txn)
            .await
            .context("Failed to delete task")?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        Self::touch(&txn, assignment_id).await?;
        txn.commit().await?;
        Ok(true)
    }

    // ========================================================================
    // Assignment Note Operations
    // ========================================================================

    async fn find_note(
        &self,
        user: &UserId,
        assignment_id: &str,
        note_id: &str,
    ) -> Result<Option<assignment_notes::Model>> {
        AssignmentNotes::find()
            .filter(assignment_notes::Column::AssignmentId.eq(assignment_id))
            .filter(assignment_notes::Column::Id.eq(note_id))
            .filter(assignment_notes::Column::UserId.eq(user.as_str()))
            .one(&self.conn)
            .await
            .context("Failed to query assignment note")
    }

    pub async fn list_notes(
        &self,
        user: &UserId,
        assignment_id: &str,
    ) -> Result<Option<Vec<AssignmentNote>>> {
        if !self.exists(user, assignment_id).await? {
            return Ok(None);
        }

        let rows = AssignmentNotes::find()
            .filter(assignment_notes::Column::AssignmentId.eq(assignment_id))
            .filter(assignment_notes::Column::UserId.eq(user.as_str()))
            .order_by_asc(assignment_notes::Column::Position)
            .all(&self.conn)
            .await
            .context("Failed to list assignment notes")?;

        Ok(Some(rows.into_iter().map(Self::map_note).collect()))
    }

    /// Appends a note, `None` if the assignment is not visible to `user`.
    pub async fn add_note(
        &self,
        user: &UserId,
        assignment_id: &str,
        request: &CreateAssignmentNoteRequest,
    ) -> Result<Option<AssignmentNote>> {
        let txn = self.conn.begin().await?;

        if Self::find_owned(&txn, user, assignment_id).await?.is_none() {
            txn.rollback().await?;
            return Ok(None);
        }

        let position = AssignmentNotes::find()
            .filter(assignment_notes::Column::AssignmentId.eq(assignment_id))
            .order_by_desc(assignment_notes::Column::Position)
            .one(&txn)
            .await?
            .map_or(0, |last| last.position + 1);

        let model = assignment_notes::ActiveModel {
            assignment_id: Set(assignment_id.to_string()),
            id: Set(new_id()),
            user_id: Set(user.to_string()),
            position: Set(position),
            headline: Set(request.headline.clone()),
            body: Set(request.body.clone()),
        }
        .insert(&txn)
        .await
        .context("Failed to insert assignment note")?;

        Self::touch(&txn, assignment_id).await?;
        txn.commit().await?;

        Ok(Some(Self::map_note(model)))
    }

    pub async fn update_note(
        &self,
        user: &UserId,
        assignment_id: &str,
        note_id: &str,
        request: UpdateAssignmentNoteRequest,
    ) -> Result<Option<AssignmentNote>> {
        let Some(model) = self.find_note(user, assignment_id, note_id).await? else {
            return Ok(None);
        };

        let mut active: assignment_notes::ActiveModel = model.into();
        if let Some(headline) = request.headline {
            active.headline = Set(headline);
        }
        if let Some(body) = request.body {
            active.body = Set(body);
        }

        let txn = self.conn.begin().await?;
        let updated = active
            .update(&txn)
            .await
            .context("Failed to update assignment note")?;
        Self::touch(&txn, assignment_id).await?;
        txn.commit().await?;

        Ok(Some(Self::map_note(updated)))
    }

    pub async fn delete_note(
        &self,
        user: &UserId,
        assignment_id: &str,
        note_id: &str,
    ) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let result = AssignmentNotes::delete_many()
            .filter(assignment_notes::Column::AssignmentId.eq(assignment_id))
            .filter(assignment_notes::Column::Id.eq(note_id))
            .filter(assignment_notes::Column::UserId.eq(user.as_str()))
            .exec(&txn)
            .await
            .context("Failed to delete assignment note")?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        Self::touch(&txn, assignment_id).await?;
        txn.commit().await?;
        Ok(true)
    }
}
