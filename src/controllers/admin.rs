use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use validator::Validate;

use crate::admin::{load_table, AdminScreen, TableQuery};
use crate::error::ApiError;
use crate::middleware::AuthToken;
use crate::models::{Hall, Movie, Schedule, User};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/admin/{screen}", get(admin_table))
}

fn api_error(e: ApiError) -> (StatusCode, String) {
    match e.status() {
        Some(status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)) => (status, e.to_string()),
        _ => {
            tracing::error!("admin table request failed: {}", e);
            (StatusCode::BAD_GATEWAY, "Failed to load data from the cinema API".to_string())
        }
    }
}

// GET /api/admin/{movies|halls|schedules|users}?search=&sort=&direction=&page=&pageSize=
async fn admin_table(
    State(state): State<Arc<AppState>>,
    Path(screen): Path<AdminScreen>,
    Query(query): Query<TableQuery>,
    AuthToken(token): AuthToken,
) -> Result<Response, (StatusCode, String)> {
    if !state.config.features.enable_admin {
        return Err((StatusCode::NOT_FOUND, "Admin screens are disabled".to_string()));
    }
    query
        .validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let client = state.api.authorized(token);
    let response = match screen {
        AdminScreen::Movies => Json(load_table::<Movie>(&client, screen, &query).await.map_err(api_error)?).into_response(),
        AdminScreen::Halls => Json(load_table::<Hall>(&client, screen, &query).await.map_err(api_error)?).into_response(),
        AdminScreen::Schedules => {
            Json(load_table::<Schedule>(&client, screen, &query).await.map_err(api_error)?).into_response()
        }
        AdminScreen::Users => Json(load_table::<User>(&client, screen, &query).await.map_err(api_error)?).into_response(),
    };
    Ok(response)
}
