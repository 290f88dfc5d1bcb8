use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{decode_list, encode_list};
use crate::domain::{Note, UserId, new_id, now_timestamp};
use crate::entities::{notes, prelude::*};
use crate::services::note_service::{CreateNoteRequest, UpdateNoteRequest};

pub struct NoteRepository {
    conn: DatabaseConnection,
}

impl NoteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: notes::Model) -> Note {
        Note {
            id: model.id,
            content: model.content,
            course_id: model.course_id,
            assignment_id: model.assignment_id,
            tags: decode_list(model.tags),
            resources: decode_list(model.resources),
            created_at: model.created_at,
            updated_at: model.updated_at,
            user_id: UserId::from(model.user_id),
        }
    }

    async fn find_model(&self, user: &UserId, id: &str) -> Result<Option<notes::Model>> {
        Notes::find()
            .filter(notes::Column::Id.eq(id))
            .filter(notes::Column::UserId.eq(user.as_str()))
            .one(&self.conn)
            .await
            .context("Failed to query note")
    }

    pub async fn list(&self, user: &UserId) -> Result<Vec<Note>> {
        let rows = Notes::find()
            .filter(notes::Column::UserId.eq(user.as_str()))
            .order_by_asc(notes::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list notes")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn list_all(&self) -> Result<Vec<Note>> {
        let rows = Notes::find()
            .order_by_asc(notes::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list notes")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn create(&self, user: &UserId, request: &CreateNoteRequest) -> Result<Note> {
        let model = notes::ActiveModel {
            id: Set(new_id()),
            user_id: Set(user.to_string()),
            content: Set(request.content.clone()),
            course_id: Set(request.course_id.clone()),
            assignment_id: Set(request.assignment_id.clone()),
            tags: Set(encode_list(request.tags.as_ref())),
            resources: Set(encode_list(request.resources.as_ref())),
            created_at: Set(now_timestamp()),
            updated_at: Set(None),
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert note")?;

        Ok(Self::map_model(model))
    }

    pub async fn update(
        &self,
        user: &UserId,
        id: &str,
        request: UpdateNoteRequest,
    ) -> Result<Option<Note>> {
        let Some(model) = self.find_model(user, id).await? else {
            return Ok(None);
        };

        let mut active: notes::ActiveModel = model.into();
        if let Some(content) = request.content {
            active.content = Set(content);
        }
        if let Some(course_id) = request.course_id {
            active.course_id = Set(course_id);
        }
        if let Some(assignment_id) = request.assignment_id {
            active.assignment_id = Set(assignment_id);
        }
        if let Some(tags) = request.tags {
            active.tags = Set(encode_list(tags.as_ref()));
        }
        if let Some(resources) = request.resources {
            active.resources = Set(encode_list(resources.as_ref()));
        }
        active.updated_at = Set(Some(now_timestamp()));

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update note")?;

        Ok(Some(Self::map_model(updated)))
    }

    pub async fn delete(&self, user: &UserId, id: &str) -> Result<bool> {
        let result = Notes::delete_many()
            .filter(notes::Column::Id.eq(id))
            .filter(notes::Column::UserId.eq(user.as_str()))
            .exec(&self.conn)
            .await
            .context("Failed to delete note")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn insert_record(&self, record: &Note) -> Result<bool> {
        if Notes::find_by_id(record.id.clone())
            .one(&self.conn)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        notes::ActiveModel {
            id: Set(record.id.clone()),
            user_id: Set(record.user_id.to_string()),
            content: Set(record.content.clone()),
            course_id: Set(record.course_id.clone()),
            assignment_id: Set(record.assignment_id.clone()),
            tags: Set(encode_list(record.tags.as_ref())),
            resources: Set(encode_list(record.resources.as_ref())),
            created_at: Set(record.created_at.clone()),
            updated_at: Set(record.updated_at.clone()),
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert note record")?;

        Ok(true)
    }
}
