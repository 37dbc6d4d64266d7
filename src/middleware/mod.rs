use axum::{
    extract::{FromRequestParts, Path},
    http::{header, request::Parts, StatusCode},
};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use crate::storage::{LocalStorage, AUTH_TOKEN_KEY};

/// Bearer-токен из заголовка `Authorization`, с которым BFF ходит в REST API.
#[derive(Debug, Clone)]
pub struct AuthToken(pub String);

/// Токен для запросов от имени сессии бронирования.
///
/// Сначала заголовок `Authorization`, затем `authToken` из хранилища
/// именно этой сессии. Токены других сессий не видны.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

fn bearer_from_header(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn missing_token() -> (StatusCode, String) {
    (StatusCode::UNAUTHORIZED, "Authorization token is missing".to_string())
}

impl FromRequestParts<Arc<crate::AppState>> for AuthToken {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        bearer_from_header(parts).map(AuthToken).ok_or_else(missing_token)
    }
}

// Маршруты вида /sessions/{id}/...: id сессии берётся из пути
impl FromRequestParts<Arc<crate::AppState>> for SessionToken {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(token) = bearer_from_header(parts) {
            return Ok(SessionToken(token));
        }

        let Path(session) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|e| (e.status(), e.body_text()))?;

        match state.client_storage(session).get(AUTH_TOKEN_KEY).await {
            Ok(Some(token)) if !token.is_empty() => Ok(SessionToken(token)),
            Ok(_) => Err(missing_token()),
            Err(e) => {
                error!("Failed to read auth token of session {}: {}", session, e);
                Err((StatusCode::INTERNAL_SERVER_ERROR, "Token storage is unavailable".to_string()))
            }
        }
    }
}
