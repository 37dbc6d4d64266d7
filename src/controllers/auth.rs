use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::put,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::storage::{LocalStorage, AUTH_TOKEN_KEY};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/sessions/{id}/token", put(store_token).delete(forget_token))
}

#[derive(Debug, Deserialize)]
struct StoreTokenRequest {
    token: String,
}

type HandlerResult<T> = Result<T, (StatusCode, String)>;

fn storage_error(e: crate::error::StorageError) -> (StatusCode, String) {
    tracing::error!("auth token storage error: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Token storage is unavailable".to_string())
}

async fn ensure_session(state: &AppState, id: Uuid) -> HandlerResult<()> {
    match state.sessions.get(id).await {
        Some(_) => Ok(()),
        None => Err((StatusCode::NOT_FOUND, format!("Booking session {} not found", id))),
    }
}

// PUT /api/sessions/{id}/token - токен, выданный бэкендом при входе
async fn store_token(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<StoreTokenRequest>,
) -> HandlerResult<impl IntoResponse> {
    let token = req.token.trim();
    if token.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "token must not be empty".to_string()));
    }
    ensure_session(&state, id).await?;
    state.client_storage(id).set(AUTH_TOKEN_KEY, token).await.map_err(storage_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/sessions/{id}/token - выход
async fn forget_token(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> HandlerResult<impl IntoResponse> {
    ensure_session(&state, id).await?;
    state.client_storage(id).remove(AUTH_TOKEN_KEY).await.map_err(storage_error)?;
    Ok(StatusCode::NO_CONTENT)
}
