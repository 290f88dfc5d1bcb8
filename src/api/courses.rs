use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::domain::Course;
use crate::services::CurrentUser;
use crate::services::course_service::{CreateCourseRequest, UpdateCourseRequest};

pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Course>>, ApiError> {
    let courses = state.shared.course_service.list_courses(&user.id).await?;
    Ok(Json(courses))
}

pub async fn create_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<CreateCourseRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let course = state
        .shared
        .course_service
        .create_course(&user.id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn update_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCourseRequest>, JsonRejection>,
) -> Result<Json<Course>, ApiError> {
    let Json(request) = payload?;
    let course = state
        .shared
        .course_service
        .update_course(&user.id, &id, request)
        .await?;

    Ok(Json(course))
}

pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .shared
        .course_service
        .delete_course(&user.id, &id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
