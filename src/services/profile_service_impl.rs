//! `SeaORM` implementation of the `ProfileService` trait.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::config::UploadConfig;
use crate::db::Store;
use crate::domain::{UserId, UserProfile, UserStats, compute_stats};
use crate::services::profile_service::{
    AvatarFile, AvatarResponse, AvatarUpload, ProfileError, ProfileService, UpdateProfileRequest,
    is_hex_color, is_safe_filename, is_servable_image,
};

pub struct SeaOrmProfileService {
    store: Store,
    uploads: UploadConfig,
}

impl SeaOrmProfileService {
    #[must_use]
    pub const fn new(store: Store, uploads: UploadConfig) -> Self {
        Self { store, uploads }
    }

    fn upload_dir(&self) -> PathBuf {
        PathBuf::from(&self.uploads.avatar_path)
    }

    fn checked_color(field: &str, value: Option<String>) -> Result<Option<String>, ProfileError> {
        match value.map(|v| v.trim().to_string()) {
            None => Ok(None),
            Some(v) if v.is_empty() => Ok(None),
            Some(v) if is_hex_color(&v) => Ok(Some(v)),
            Some(v) => Err(ProfileError::Validation(format!(
                "{field} must be a hex color like #RRGGBB, got {v:?}"
            ))),
        }
    }

    /// Extension for a stored avatar: the upload's own extension when it names an
    /// image type, else the first one registered for its content type.
    fn extension_for(upload: &AvatarUpload) -> Option<String> {
        let from_name = upload
            .file_name
            .as_deref()
            .and_then(|n| Path::new(n).extension())
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
            .filter(|e| mime_guess::from_ext(e).iter().any(|m| is_servable_image(&m)));

        from_name
            .or_else(|| {
                mime_guess::get_mime_extensions_str(&upload.content_type)?
                    .iter()
                    .find(|ext| mime_guess::from_ext(ext).iter().any(|m| is_servable_image(&m)))
                    .map(|ext| (*ext).to_string())
            })
            .map(|ext| format!(".{ext}"))
    }
}

#[async_trait]
impl ProfileService for SeaOrmProfileService {
    async fn get_profile(&self, user: &UserId) -> Result<UserProfile, ProfileError> {
        self.store
            .users()
            .ensure_profile(user)
            .await?
            .ok_or(ProfileError::UserNotFound)
    }

    async fn update_profile(
        &self,
        user: &UserId,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile, ProfileError> {
        let background = Self::checked_color("backgroundColor", request.background_color)?;
        let accent = Self::checked_color("accentColor", request.accent_color)?;

        self.store
            .users()
            .update_profile(user, background, accent)
            .await?
            .ok_or(ProfileError::UserNotFound)
    }

    async fn upload_avatar(
        &self,
        user: &UserId,
        upload: AvatarUpload,
    ) -> Result<AvatarResponse, ProfileError> {
        if !upload.content_type.starts_with("image/") {
            return Err(ProfileError::Validation(
                "Only image files are allowed".to_string(),
            ));
        }
        if upload.bytes.is_empty() {
            return Err(ProfileError::Validation("Avatar file is empty".to_string()));
        }
        if upload.bytes.len() > self.uploads.max_avatar_bytes {
            return Err(ProfileError::Validation(format!(
                "Avatar exceeds the {} byte limit",
                self.uploads.max_avatar_bytes
            )));
        }

        let Some(extension) = Self::extension_for(&upload) else {
            return Err(ProfileError::Validation(format!(
                "Unsupported image type {}",
                upload.content_type
            )));
        };

        let dir = self.upload_dir();
        fs::create_dir_all(&dir).await?;

        let millis = chrono::Utc::now().timestamp_millis();
        let filename = format!("avatar_{user}_{millis}{extension}");
        fs::write(dir.join(&filename), &upload.bytes).await?;

        let Some((_, previous)) = self.store.users().set_avatar(user, &filename).await? else {
            let _ = fs::remove_file(dir.join(&filename)).await;
            return Err(ProfileError::UserNotFound);
        };

        if let Some(old) = previous.filter(|old| old != &filename && is_safe_filename(old)) {
            if let Err(e) = fs::remove_file(dir.join(&old)).await {
                warn!(file = %old, error = %e, "Failed to remove previous avatar");
            }
        }

        info!(user_id = %user, file = %filename, bytes = upload.bytes.len(), "Stored avatar");
        Ok(AvatarResponse { avatar: filename })
    }

    async fn read_avatar(&self, filename: &str) -> Result<AvatarFile, ProfileError> {
        if !is_safe_filename(filename) {
            return Err(ProfileError::AvatarNotFound);
        }

        let path = self.upload_dir().join(filename);
        let Some(mime) = mime_guess::from_path(&path)
            .iter()
            .find(is_servable_image)
        else {
            warn!(file = %filename, "Refusing to serve non-image avatar");
            return Err(ProfileError::AvatarNotFound);
        };

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProfileError::AvatarNotFound);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(AvatarFile {
            content_type: mime.to_string(),
            bytes,
        })
    }

    async fn get_stats(&self, user: &UserId) -> Result<UserStats, ProfileError> {
        let total_courses = self.store.courses().count(user).await?;
        let total_courses = usize::try_from(total_courses).unwrap_or(usize::MAX);
        let assignments = self.store.assignments().list(user).await?;
        Ok(compute_stats(total_courses, &assignments))
    }
}
