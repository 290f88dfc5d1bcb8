use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKGROUND_COLOR: &str = "#111111";
pub const DEFAULT_ACCENT_COLOR: &str = "#A084E8";

/// Appearance settings and avatar of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub background_color: String,
    pub accent_color: String,
    pub created_at: String,
    pub updated_at: String,
}

impl UserProfile {
    /// Profile handed out to users that never customised theirs.
    #[must_use]
    pub fn new_default(now: &str) -> Self {
        Self {
            avatar: None,
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }
}

/// A user as stored in the `users` JSON collection, password hash included.
///
/// Only used by import/export; the API never serializes this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    #[serde(alias = "password")]
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_password_field_is_accepted() {
        let json = r#"{"id": "1", "username": "ada", "password": "$2b$10$hash"}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(user.password_hash, "$2b$10$hash");
        assert!(user.profile.is_none());
    }

    #[test]
    fn default_profile_colors() {
        let profile = UserProfile::new_default("2024-01-01T00:00:00Z");
        assert_eq!(profile.background_color, "#111111");
        assert_eq!(profile.accent_color, "#A084E8");
        assert_eq!(profile.created_at, profile.updated_at);
    }
}
