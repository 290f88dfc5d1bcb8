//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tokio::task;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::db::repositories::user::hash_password;
use crate::services::auth_service::{AuthError, AuthService, Credentials, TokenResponse};
use crate::services::token::{CurrentUser, TokenSigner};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
    signer: TokenSigner,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig, signer: TokenSigner) -> Self {
        Self {
            store,
            security,
            signer,
        }
    }

    fn require_fields(credentials: &Credentials) -> Result<(), AuthError> {
        if credentials.username.trim().is_empty() || credentials.password.is_empty() {
            return Err(AuthError::Validation(
                "Username and password are required".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, credentials: Credentials) -> Result<TokenResponse, AuthError> {
        Self::require_fields(&credentials)?;
        let username = credentials.username.trim().to_string();

        let users = self.store.users();
        if users.get_by_username(&username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let password = credentials.password;
        let config = self.security.clone();
        let hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing task panicked: {e}")))??;

        // The unique index still guards against a concurrent registration.
        let user = users.create(&username, hash).await.map_err(|e| {
            if e.chain().any(|c| c.to_string().contains("UNIQUE")) {
                AuthError::UsernameTaken
            } else {
                AuthError::from(e)
            }
        })?;

        info!(user_id = %user.id, username = %user.username, "Registered user");

        let token = self.signer.issue(&user.id, &user.username)?;
        Ok(TokenResponse { token })
    }

    async fn login(&self, credentials: Credentials) -> Result<TokenResponse, AuthError> {
        Self::require_fields(&credentials)?;

        let user = self
            .store
            .users()
            .verify_password(credentials.username.trim(), &credentials.password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self.signer.issue(&user.id, &user.username)?;
        Ok(TokenResponse { token })
    }

    async fn verify_token(&self, token: &str) -> Result<CurrentUser, AuthError> {
        self.signer.verify(token).ok_or(AuthError::Unauthorized)
    }
}
