use axum::{
    Extension, Json,
    extract::{Multipart, Path, State, rejection::JsonRejection},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::domain::{UserProfile, UserStats};
use crate::services::CurrentUser;
use crate::services::profile_service::{AvatarResponse, AvatarUpload, UpdateProfileRequest};

/// Multipart field carrying the avatar image.
const AVATAR_FIELD: &str = "avatar";

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(
        state.shared.profile_service.get_profile(&user.id).await?,
    ))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let Json(request) = payload?;
    let profile = state
        .shared
        .profile_service
        .update_profile(&user.id, request)
        .await?;

    Ok(Json(profile))
}

/// POST /profile/avatar
///
/// Expects a `multipart/form-data` body with the image in the `avatar` field.
pub async fn upload_avatar(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<Json<AvatarResponse>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }

        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_default();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("Failed to read avatar: {e}")))?;

        upload = Some(AvatarUpload {
            content_type,
            file_name,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let upload = upload.ok_or_else(|| ApiError::validation("No avatar file uploaded"))?;
    let response = state
        .shared
        .profile_service
        .upload_avatar(&user.id, upload)
        .await?;

    Ok(Json(response))
}

pub async fn get_avatar(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let file = state.shared.profile_service.read_avatar(&filename).await?;
    Ok(([(header::CONTENT_TYPE, file.content_type)], file.bytes))
}

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserStats>, ApiError> {
    Ok(Json(state.shared.profile_service.get_stats(&user.id).await?))
}
