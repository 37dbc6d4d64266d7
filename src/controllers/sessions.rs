use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::middleware::SessionToken;
use crate::models::SeatId;
use crate::seats::{SelectionPhase, ToggleOutcome};
use crate::sessions::SessionView;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions", post(open_session))
        .route("/sessions/{id}", get(get_session).delete(close_session))
        .route("/sessions/{id}/seats/{seat_id}/toggle", patch(toggle_seat))
        .route("/sessions/{id}/reserve", post(reserve_seats))
        .route("/sessions/{id}/continue", post(continue_to_summary))
        .route("/sessions/{id}/back", post(back_to_selection))
        .route("/sessions/{id}/confirm", post(confirm_booking))
}

/* ---------- helpers ---------- */

type HandlerResult<T> = Result<T, (StatusCode, String)>;

fn session_not_found(id: Uuid) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("Booking session {} not found", id))
}

async fn session_view(state: &AppState, id: Uuid) -> HandlerResult<SessionView> {
    let booking = &state.config.booking;
    state
        .sessions
        .get(id)
        .await
        .map(|s| s.view(booking.unit_price, booking.label_style))
        .ok_or_else(|| session_not_found(id))
}

/* ---------- SESSIONS ---------- */

// POST /api/sessions
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenSessionRequest {
    schedule_id: i64,
}

async fn open_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OpenSessionRequest>,
) -> HandlerResult<impl IntoResponse> {
    if req.schedule_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "scheduleId must be > 0".to_string()));
    }
    let session = state.sessions.open(req.schedule_id).await;
    let booking = &state.config.booking;
    Ok((StatusCode::CREATED, Json(session.view(booking.unit_price, booking.label_style))))
}

// GET /api/sessions/{id}
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> HandlerResult<impl IntoResponse> {
    Ok(Json(session_view(&state, id).await?))
}

// DELETE /api/sessions/{id} - уход со страницы
async fn close_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> HandlerResult<impl IntoResponse> {
    if state.close_session(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

/* ---------- SEATS ---------- */

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToggleResponse {
    outcome: ToggleOutcome,
    phase: SelectionPhase,
    selected: Vec<SeatId>,
    total: u64,
}

// PATCH /api/sessions/{id}/seats/{seat_id}/toggle
async fn toggle_seat(
    State(state): State<Arc<AppState>>,
    Path((id, seat_id)): Path<(Uuid, String)>,
) -> HandlerResult<impl IntoResponse> {
    let seat: SeatId = seat_id
        .parse()
        .map_err(|e: crate::error::SeatIdError| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let unit_price = state.config.booking.unit_price;

    let response = state
        .sessions
        .update(id, |s| {
            let outcome = s.selection.toggle_seat(&s.grid, seat);
            ToggleResponse {
                outcome,
                phase: s.selection.phase(),
                selected: s.selection.seats().to_vec(),
                total: s.selection.total_price(unit_price),
            }
        })
        .await
        .ok_or_else(|| session_not_found(id))?;

    tracing::debug!("Session {}: seat {} -> {:?}", id, seat, response.outcome);
    Ok(Json(response))
}

/* ---------- BOOKING ---------- */

// POST /api/sessions/{id}/reserve
async fn reserve_seats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    SessionToken(token): SessionToken,
) -> HandlerResult<impl IntoResponse> {
    let (schedule_id, seats) = state
        .sessions
        .get(id)
        .await
        .map(|s| (s.schedule_id, s.selection.seats().to_vec()))
        .ok_or_else(|| session_not_found(id))?;

    if seats.is_empty() {
        return Err((StatusCode::CONFLICT, "Select at least one seat".to_string()));
    }

    let reserved = state
        .reserver(id, token)
        .reserve_missing(schedule_id, &seats)
        .await
        .map_err(|e| (e.http_status(), e.to_string()))?;

    Ok(Json(serde_json::json!({ "reserved": reserved })))
}

// POST /api/sessions/{id}/continue
async fn continue_to_summary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> HandlerResult<impl IntoResponse> {
    let booking = &state.config.booking;
    let summary = state
        .sessions
        .update(id, |s| {
            s.selection
                .continue_to_summary()
                .map(|_| s.selection.summary(booking.unit_price, booking.label_style))
        })
        .await
        .ok_or_else(|| session_not_found(id))?
        .map_err(|e| (StatusCode::CONFLICT, e.to_string()))?;

    Ok(Json(summary))
}

// POST /api/sessions/{id}/back
async fn back_to_selection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> HandlerResult<impl IntoResponse> {
    let moved = state
        .sessions
        .update(id, |s| !s.confirming && s.selection.back())
        .await
        .ok_or_else(|| session_not_found(id))?;

    if !moved {
        return Err((StatusCode::CONFLICT, "Booking is not on the summary step".to_string()));
    }
    Ok(Json(session_view(&state, id).await?))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmResponse {
    confirmed: Vec<SeatId>,
    message: String,
}

// POST /api/sessions/{id}/confirm
async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    SessionToken(token): SessionToken,
) -> HandlerResult<impl IntoResponse> {
    // снимок выбора; сессия помечается, чтобы не запустить подтверждение дважды
    let seats = state
        .sessions
        .update(id, |s| {
            if s.selection.phase() != SelectionPhase::Confirming {
                return Err((StatusCode::CONFLICT, "Continue to the summary first".to_string()));
            }
            if s.confirming {
                return Err((StatusCode::CONFLICT, "Confirmation is already in progress".to_string()));
            }
            s.confirming = true;
            Ok(s.selection.seats().to_vec())
        })
        .await
        .ok_or_else(|| session_not_found(id))??;

    let result = state.confirmer(id, token).confirm_all(&seats).await;

    let finished = state
        .sessions
        .update(id, |s| {
            s.confirming = false;
            match &result {
                Ok(_) => s.selection.complete().is_ok(),
                Err(_) => false,
            }
        })
        .await
        .unwrap_or(false);

    match result {
        Ok(report) => {
            if !finished {
                tracing::warn!("Session {} closed while its booking was being confirmed", id);
            }
            Ok(Json(ConfirmResponse {
                message: format!("{} seats booked", report.confirmed.len()),
                confirmed: report.confirmed,
            }))
        }
        Err(e) => Err((e.http_status(), e.to_string())),
    }
}
