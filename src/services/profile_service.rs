//! Domain service for the caller's profile, avatar and statistics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{UserId, UserProfile, UserStats};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("User not found")]
    UserNotFound,

    #[error("Avatar not found")]
    AvatarNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for ProfileError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ProfileError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<std::io::Error> for ProfileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
}

/// A received avatar file.
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub content_type: String,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvatarResponse {
    pub avatar: String,
}

/// Avatar bytes and the content type to serve them with.
#[derive(Debug, Clone)]
pub struct AvatarFile {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[async_trait::async_trait]
pub trait ProfileService: Send + Sync {
    /// Returns the profile, persisting a default one on first access.
    async fn get_profile(&self, user: &UserId) -> Result<UserProfile, ProfileError>;

    /// Updates the colors. Empty or missing values keep the current ones.
    async fn update_profile(
        &self,
        user: &UserId,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile, ProfileError>;

    /// Stores a new avatar image and removes the previous file.
    async fn upload_avatar(
        &self,
        user: &UserId,
        upload: AvatarUpload,
    ) -> Result<AvatarResponse, ProfileError>;

    async fn read_avatar(&self, filename: &str) -> Result<AvatarFile, ProfileError>;

    async fn get_stats(&self, user: &UserId) -> Result<UserStats, ProfileError>;
}

/// `#RGB` or `#RRGGBB`.
#[must_use]
pub fn is_hex_color(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}

/// A bare file name that cannot escape the upload directory.
#[must_use]
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
        && !name.contains('\0')
}

/// Raster image types that are safe to serve back inline. SVG is excluded since
/// it can carry script.
#[must_use]
pub fn is_servable_image(mime: &mime_guess::Mime) -> bool {
    mime.type_() == mime_guess::mime::IMAGE && mime.subtype() != mime_guess::mime::SVG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert!(is_hex_color("#111111"));
        assert!(is_hex_color("#A084E8"));
        assert!(is_hex_color("#fff"));
        assert!(!is_hex_color("111111"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("#GGGGGG"));
        assert!(!is_hex_color("red"));
    }

    #[test]
    fn avatar_filenames() {
        assert!(is_safe_filename("avatar_u1_1700000000000.png"));
        assert!(!is_safe_filename("../config.toml"));
        assert!(!is_safe_filename("a/b.png"));
        assert!(!is_safe_filename("a\\b.png"));
        assert!(!is_safe_filename(""));
    }

    #[test]
    fn servable_images() {
        let first = |ext| mime_guess::from_ext(ext).first_or_octet_stream();
        assert!(is_servable_image(&first("png")));
        assert!(is_servable_image(&first("jpg")));
        assert!(is_servable_image(&first("webp")));
        assert!(!is_servable_image(&first("svg")));
        assert!(!is_servable_image(&first("html")));
        assert!(!is_servable_image(&first("bin")));
    }

    #[test]
    fn update_rejects_unknown_fields() {
        let ok: UpdateProfileRequest =
            serde_json::from_str(r##"{"accentColor": "#fff"}"##).unwrap();
        assert_eq!(ok.accent_color.as_deref(), Some("#fff"));
        assert!(ok.background_color.is_none());

        let err = serde_json::from_str::<UpdateProfileRequest>(r#"{"avatar": "x.png"}"#);
        assert!(err.is_err());
    }
}
