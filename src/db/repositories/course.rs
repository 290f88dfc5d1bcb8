use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use tracing::info;

use super::assignment::AssignmentRepository;
use crate::domain::{Course, UserId, new_id, now_timestamp};
use crate::entities::{assignments, courses, notes, prelude::*};
use crate::services::course_service::UpdateCourseRequest;

pub struct CourseRepository {
    conn: DatabaseConnection,
}

impl CourseRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: courses::Model) -> Course {
        Course {
            id: model.id,
            name: model.name,
            color: model.color,
            user_id: UserId::from(model.user_id),
            created_at: Some(model.created_at),
            updated_at: Some(model.updated_at),
        }
    }

    async fn find_model(&self, user: &UserId, id: &str) -> Result<Option<courses::Model>> {
        Courses::find()
            .filter(courses::Column::Id.eq(id))
            .filter(courses::Column::UserId.eq(user.as_str()))
            .one(&self.conn)
            .await
            .context("Failed to query course")
    }

    pub async fn list(&self, user: &UserId) -> Result<Vec<Course>> {
        let rows = Courses::find()
            .filter(courses::Column::UserId.eq(user.as_str()))
            .order_by_asc(courses::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list courses")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn list_all(&self) -> Result<Vec<Course>> {
        let rows = Courses::find()
            .order_by_asc(courses::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list courses")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn exists(&self, user: &UserId, id: &str) -> Result<bool> {
        Ok(self.find_model(user, id).await?.is_some())
    }

    pub async fn count(&self, user: &UserId) -> Result<u64> {
        Courses::find()
            .filter(courses::Column::UserId.eq(user.as_str()))
            .count(&self.conn)
            .await
            .context("Failed to count courses")
    }

    pub async fn create(&self, user: &UserId, name: &str, color: Option<String>) -> Result<Course> {
        let now = now_timestamp();

        let model = courses::ActiveModel {
            id: Set(new_id()),
            user_id: Set(user.to_string()),
            name: Set(name.to_string()),
            color: Set(color),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert course")?;

        info!("Created course {} for user {}", model.id, user);
        Ok(Self::map_model(model))
    }

    pub async fn update(
        &self,
        user: &UserId,
        id: &str,
        request: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        let Some(model) = self.find_model(user, id).await? else {
            return Ok(None);
        };

        let mut active: courses::ActiveModel = model.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(color) = request.color {
            active.color = Set(color);
        }
        active.updated_at = Set(now_timestamp());

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update course")?;

        Ok(Some(Self::map_model(updated)))
    }

    /// Deletes a course, its assignments and their children in one transaction.
    ///
    /// Notes linked to any removed record are unlinked, not deleted.
    pub async fn delete_cascade(&self, user: &UserId, id: &str) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let exists = Courses::find()
            .filter(courses::Column::Id.eq(id))
            .filter(courses::Column::UserId.eq(user.as_str()))
            .one(&txn)
            .await?
            .is_some();
        if !exists {
            txn.rollback().await?;
            return Ok(false);
        }

        let assignment_ids: Vec<String> = Assignments::find()
            .select_only()
            .column(assignments::Column::Id)
            .filter(assignments::Column::CourseId.eq(id))
            .filter(assignments::Column::UserId.eq(user.as_str()))
            .into_tuple()
            .all(&txn)
            .await?;

        AssignmentRepository::delete_children(&txn, &assignment_ids).await?;

        if !assignment_ids.is_empty() {
            Assignments::delete_many()
                .filter(assignments::Column::Id.is_in(assignment_ids.iter().cloned()))
                .exec(&txn)
                .await?;

            Notes::update_many()
                .col_expr(notes::Column::AssignmentId, Expr::value(Option::<String>::None))
                .filter(notes::Column::UserId.eq(user.as_str()))
                .filter(notes::Column::AssignmentId.is_in(assignment_ids.iter().cloned()))
                .exec(&txn)
                .await?;
        }

        Notes::update_many()
            .col_expr(notes::Column::CourseId, Expr::value(Option::<String>::None))
            .filter(notes::Column::UserId.eq(user.as_str()))
            .filter(notes::Column::CourseId.eq(id))
            .exec(&txn)
            .await?;

        Courses::delete_many()
            .filter(courses::Column::Id.eq(id))
            .filter(courses::Column::UserId.eq(user.as_str()))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(
            "Deleted course {} and {} assignment(s) for user {}",
            id,
            assignment_ids.len(),
            user
        );
        Ok(true)
    }

    pub async fn insert_record(&self, record: &Course) -> Result<bool> {
        if Courses::find_by_id(record.id.clone())
            .one(&self.conn)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        let now = now_timestamp();
        courses::ActiveModel {
            id: Set(record.id.clone()),
            user_id: Set(record.user_id.to_string()),
            name: Set(record.name.clone()),
            color: Set(record.color.clone()),
            created_at: Set(record.created_at.clone().unwrap_or_else(|| now.clone())),
            updated_at: Set(record.updated_at.clone().unwrap_or(now)),
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert course record")?;

        Ok(true)
    }
}
