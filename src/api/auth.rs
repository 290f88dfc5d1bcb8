use axum::{
    Extension, Json,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::services::{CurrentUser, auth_service::Credentials};

#[derive(Serialize)]
pub struct MeResponse {
    pub id: String,
    pub username: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Rejects requests without a valid `Authorization: Bearer <token>` header and
/// makes the resolved [`CurrentUser`] available to handlers as an extension.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(&headers).ok_or_else(ApiError::unauthorized)?;

    let user = state
        .shared
        .auth_service
        .verify_token(&token)
        .await
        .map_err(|_| ApiError::unauthorized())?;

    tracing::Span::current().record("user_id", user.id.as_str());
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

// ============================================================================
// Handlers
// ============================================================================

fn credentials(payload: Result<Json<Credentials>, JsonRejection>) -> Credentials {
    // A malformed body counts as missing fields.
    payload.map(|Json(c)| c).unwrap_or_default()
}

/// POST /register
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state
        .shared
        .auth_service
        .register(credentials(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(token)))
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state.shared.auth_service.login(credentials(payload)).await?;
    Ok(Json(token))
}

/// GET /me
pub async fn me(Extension(user): Extension<CurrentUser>) -> Json<MeResponse> {
    Json(MeResponse {
        id: user.id.into_inner(),
        username: user.username,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_bearer(&headers).as_deref(), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer(&headers), None);
    }
}
