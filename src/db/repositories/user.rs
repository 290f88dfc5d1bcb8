use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tokio::task;
use tracing::warn;

use crate::config::SecurityConfig;
use crate::domain::{UserId, UserProfile, UserRecord, new_id, now_timestamp};
use crate::entities::users;

/// User data returned from repository (without sensitive password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub created_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: UserId::from(model.id),
            username: model.username,
            created_at: model.created_at,
        }
    }
}

fn profile_of(model: &users::Model) -> Option<UserProfile> {
    let created_at = model.profile_created_at.clone()?;
    let mut profile = UserProfile::new_default(&created_at);
    profile.avatar.clone_from(&model.avatar);
    if let Some(bg) = &model.background_color {
        profile.background_color.clone_from(bg);
    }
    if let Some(accent) = &model.accent_color {
        profile.accent_color.clone_from(accent);
    }
    profile.updated_at = model
        .profile_updated_at
        .clone()
        .unwrap_or(created_at);
    Some(profile)
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn find_model(&self, id: &UserId) -> Result<Option<users::Model>> {
        users::Entity::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")
    }

    /// Create a user with an already hashed password.
    pub async fn create(&self, username: &str, password_hash: String) -> Result<User> {
        let now = now_timestamp();

        let model = users::ActiveModel {
            id: Set(new_id()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            avatar: Set(None),
            background_color: Set(None),
            accent_color: Set(None),
            profile_created_at: Set(None),
            profile_updated_at: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert user")?;

        Ok(User::from(model))
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &UserId) -> Result<Option<User>> {
        Ok(self.find_model(id).await?.map(User::from))
    }

    /// Verify password for a user, returning the user on success.
    /// Note: This uses `spawn_blocking` because Argon2 hashing is CPU-intensive
    /// and would block the async runtime if run directly.
    pub async fn verify_password(&self, username: &str, password: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(None);
        };

        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        // Run CPU-intensive password verification in a blocking task
        let is_valid = task::spawn_blocking(move || {
            let Ok(parsed_hash) = PasswordHash::new(&password_hash) else {
                return false;
            };

            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        })
        .await
        .context("Password verification task panicked")?;

        if !is_valid && !user.password_hash.starts_with("$argon2") {
            warn!(
                username = %user.username,
                "Stored password hash is not argon2; the account cannot log in until it is reset"
            );
        }

        Ok(is_valid.then(|| User::from(user)))
    }

    /// Profile of a user, created with default colors on first access.
    pub async fn ensure_profile(&self, id: &UserId) -> Result<Option<UserProfile>> {
        let Some(model) = self.find_model(id).await? else {
            return Ok(None);
        };

        if let Some(profile) = profile_of(&model) {
            return Ok(Some(profile));
        }

        let now = now_timestamp();
        let defaults = UserProfile::new_default(&now);

        let mut active: users::ActiveModel = model.into();
        active.background_color = Set(Some(defaults.background_color.clone()));
        active.accent_color = Set(Some(defaults.accent_color.clone()));
        active.profile_created_at = Set(Some(now.clone()));
        active.profile_updated_at = Set(Some(now));
        let updated = active.update(&self.conn).await?;

        Ok(profile_of(&updated))
    }

    /// Update the profile colors. Absent values are left as they are.
    pub async fn update_profile(
        &self,
        id: &UserId,
        background_color: Option<String>,
        accent_color: Option<String>,
    ) -> Result<Option<UserProfile>> {
        if self.ensure_profile(id).await?.is_none() {
            return Ok(None);
        }
        let Some(model) = self.find_model(id).await? else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = model.into();
        if let Some(bg) = background_color {
            active.background_color = Set(Some(bg));
        }
        if let Some(accent) = accent_color {
            active.accent_color = Set(Some(accent));
        }
        active.profile_updated_at = Set(Some(now_timestamp()));
        let updated = active.update(&self.conn).await?;

        Ok(profile_of(&updated))
    }

    /// Point the profile at a new avatar file, returning the previous filename.
    pub async fn set_avatar(
        &self,
        id: &UserId,
        filename: &str,
    ) -> Result<Option<(UserProfile, Option<String>)>> {
        if self.ensure_profile(id).await?.is_none() {
            return Ok(None);
        }
        let Some(model) = self.find_model(id).await? else {
            return Ok(None);
        };

        let previous = model.avatar.clone();
        let mut active: users::ActiveModel = model.into();
        active.avatar = Set(Some(filename.to_string()));
        active.profile_updated_at = Set(Some(now_timestamp()));
        let updated = active.update(&self.conn).await?;

        Ok(profile_of(&updated).map(|p| (p, previous)))
    }

    /// All users with hashes and profiles. Used by export only.
    pub async fn list_records(&self) -> Result<Vec<UserRecord>> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(models
            .into_iter()
            .map(|m| UserRecord {
                profile: profile_of(&m),
                id: m.id,
                username: m.username,
                password_hash: m.password_hash,
            })
            .collect())
    }

    /// Inserts an exported user unless its id or username is already taken.
    pub async fn insert_record(&self, record: &UserRecord) -> Result<bool> {
        let taken = users::Entity::find()
            .filter(
                users::Column::Id
                    .eq(record.id.as_str())
                    .or(users::Column::Username.eq(record.username.as_str())),
            )
            .one(&self.conn)
            .await?
            .is_some();
        if taken {
            return Ok(false);
        }

        let now = now_timestamp();
        let profile = record.profile.as_ref();

        users::ActiveModel {
            id: Set(record.id.clone()),
            username: Set(record.username.clone()),
            password_hash: Set(record.password_hash.clone()),
            avatar: Set(profile.and_then(|p| p.avatar.clone())),
            background_color: Set(profile.map(|p| p.background_color.clone())),
            accent_color: Set(profile.map(|p| p.accent_color.clone())),
            profile_created_at: Set(profile.map(|p| p.created_at.clone())),
            profile_updated_at: Set(profile.map(|p| p.updated_at.clone())),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert user record")?;

        Ok(true)
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the library default params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_with_default_verifier() {
        let config = SecurityConfig::default();
        let hash = hash_password("hunter22", Some(&config)).unwrap();
        assert!(hash.starts_with("$argon2id$"));

        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"hunter22", &parsed)
                .is_ok()
        );
        assert!(Argon2::default().verify_password(b"wrong", &parsed).is_err());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("pw", None).unwrap();
        let b = hash_password("pw", None).unwrap();
        assert_ne!(a, b);
    }
}
