//! Domain service for registration, login and token verification.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::token::CurrentUser;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Body of both `/register` and `/login`. Missing fields deserialize as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account and returns a token for it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for an empty username or password and
    /// [`AuthError::UsernameTaken`] when the name is in use.
    async fn register(&self, credentials: Credentials) -> Result<TokenResponse, AuthError>;

    /// Verifies credentials and returns a fresh token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, credentials: Credentials) -> Result<TokenResponse, AuthError>;

    /// Resolves a bearer token to the caller identity.
    async fn verify_token(&self, token: &str) -> Result<CurrentUser, AuthError>;
}
