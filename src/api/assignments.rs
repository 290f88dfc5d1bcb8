use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::domain::{Assignment, AssignmentNote, Task};
use crate::services::CurrentUser;
use crate::services::assignment_service::{
    AssignmentProgress, CreateAssignmentNoteRequest, CreateAssignmentRequest, CreateTaskRequest,
    UpdateAssignmentNoteRequest, UpdateAssignmentRequest, UpdateTaskRequest,
};

// ============================================================================
// Assignments
// ============================================================================

pub async fn list_assignments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Assignment>>, ApiError> {
    let assignments = state
        .shared
        .assignment_service
        .list_assignments(&user.id)
        .await?;

    Ok(Json(assignments))
}

pub async fn create_assignment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<CreateAssignmentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let assignment = state
        .shared
        .assignment_service
        .create_assignment(&user.id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

pub async fn update_assignment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAssignmentRequest>, JsonRejection>,
) -> Result<Json<Assignment>, ApiError> {
    let Json(request) = payload?;
    let assignment = state
        .shared
        .assignment_service
        .update_assignment(&user.id, &id, request)
        .await?;

    Ok(Json(assignment))
}

pub async fn delete_assignment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .shared
        .assignment_service
        .delete_assignment(&user.id, &id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<AssignmentProgress>, ApiError> {
    let progress = state
        .shared
        .assignment_service
        .get_progress(&user.id, &id)
        .await?;

    Ok(Json(progress))
}

// ============================================================================
// Tasks
// ============================================================================

pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state
        .shared
        .assignment_service
        .list_tasks(&user.id, &id)
        .await?;

    Ok(Json(tasks))
}

pub async fn add_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let task = state
        .shared
        .assignment_service
        .add_task(&user.id, &id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path((id, task_id)): Path<(String, String)>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(request) = payload?;
    let task = state
        .shared
        .assignment_service
        .update_task(&user.id, &id, &task_id, request)
        .await?;

    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path((id, task_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .shared
        .assignment_service
        .delete_task(&user.id, &id, &task_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Assignment notes
// ============================================================================

pub async fn list_notes(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Vec<AssignmentNote>>, ApiError> {
    let notes = state
        .shared
        .assignment_service
        .list_notes(&user.id, &id)
        .await?;

    Ok(Json(notes))
}

pub async fn add_note(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    payload: Result<Json<CreateAssignmentNoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let note = state
        .shared
        .assignment_service
        .add_note(&user.id, &id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn update_note(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path((id, note_id)): Path<(String, String)>,
    payload: Result<Json<UpdateAssignmentNoteRequest>, JsonRejection>,
) -> Result<Json<AssignmentNote>, ApiError> {
    let Json(request) = payload?;
    let note = state
        .shared
        .assignment_service
        .update_note(&user.id, &id, &note_id, request)
        .await?;

    Ok(Json(note))
}

pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path((id, note_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .shared
        .assignment_service
        .delete_note(&user.id, &id, &note_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
