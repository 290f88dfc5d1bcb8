//! `SeaORM` implementation of the `CourseService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::domain::{Course, UserId};
use crate::services::course_service::{
    CourseError, CourseService, CreateCourseRequest, UpdateCourseRequest,
};
use crate::services::patch::required_text;

pub struct SeaOrmCourseService {
    store: Store,
}

impl SeaOrmCourseService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CourseService for SeaOrmCourseService {
    async fn list_courses(&self, user: &UserId) -> Result<Vec<Course>, CourseError> {
        Ok(self.store.courses().list(user).await?)
    }

    async fn create_course(
        &self,
        user: &UserId,
        request: CreateCourseRequest,
    ) -> Result<Course, CourseError> {
        let name = required_text("name", &request.name).map_err(CourseError::Validation)?;

        Ok(self
            .store
            .courses()
            .create(user, &name, request.color)
            .await?)
    }

    async fn update_course(
        &self,
        user: &UserId,
        id: &str,
        mut request: UpdateCourseRequest,
    ) -> Result<Course, CourseError> {
        if let Some(name) = request.name.as_deref() {
            request.name = Some(required_text("name", name).map_err(CourseError::Validation)?);
        }

        self.store
            .courses()
            .update(user, id, request)
            .await?
            .ok_or(CourseError::NotFound)
    }

    async fn delete_course(&self, user: &UserId, id: &str) -> Result<(), CourseError> {
        if self.store.courses().delete_cascade(user, id).await? {
            Ok(())
        } else {
            Err(CourseError::NotFound)
        }
    }
}
