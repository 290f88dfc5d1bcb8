use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::domain::Note;
use crate::services::CurrentUser;
use crate::services::note_service::{CreateNoteRequest, UpdateNoteRequest};

pub async fn list_notes(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(state.shared.note_service.list_notes(&user.id).await?))
}

pub async fn create_note(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let note = state
        .shared
        .note_service
        .create_note(&user.id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn update_note(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let Json(request) = payload?;
    let note = state
        .shared
        .note_service
        .update_note(&user.id, &id, request)
        .await?;

    Ok(Json(note))
}

pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.shared.note_service.delete_note(&user.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
