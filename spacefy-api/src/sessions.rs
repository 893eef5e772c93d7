use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use spacefy_booking::{BookingController, ControllerError, ControllerSnapshot, PickedValue, PickerTarget};
use spacefy_shared::StoredBooking;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::info;
use uuid::Uuid;
use crate::bookings::persist_booking;
use crate::error::AppError;
use crate::listings::load_listing;
use crate::state::{AppState, Session};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OpenSessionRequest {
    pub listing_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct OpenPickerRequest {
    pub target: PickerTarget,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub snapshot: ControllerSnapshot,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub booking: StoredBooking,
    pub session: SessionResponse,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions", post(open_session))
        .route("/v1/sessions/{id}", get(get_session).delete(close_session))
        .route("/v1/sessions/{id}/picker", post(open_picker))
        .route("/v1/sessions/{id}/select", post(select_value))
        .route("/v1/sessions/{id}/dismiss", post(dismiss_picker))
        .route("/v1/sessions/{id}/confirm", post(confirm_booking))
        .route("/v1/sessions/{id}/reset", post(reset_session))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/sessions
/// Open a listing's detail view
async fn open_session(
    State(state): State<AppState>,
    Json(req): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let listing = load_listing(&state, req.listing_id).await?;
    state.sweep_sessions().await;

    let now = state.now();
    let controller = BookingController::open(&listing, state.policy, now);

    let session_id = Uuid::new_v4();
    let response = SessionResponse {
        session_id,
        snapshot: controller.snapshot(now),
    };
    state
        .sessions
        .write()
        .await
        .insert(session_id, Arc::new(Mutex::new(Session::new(controller, now))));

    info!("Session {} opened for listing {}", session_id, listing.id());
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /v1/sessions/{id}
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = lock_session(&state, id).await?;
    Ok(Json(respond(id, &session.controller, &state)))
}

/// DELETE /v1/sessions/{id}
/// Close the detail view, discarding its window
async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .write()
        .await
        .remove(&id)
        .ok_or_else(|| session_not_found(id))?;
    info!("Session {} closed", id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/sessions/{id}/picker
async fn open_picker(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<OpenPickerRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    with_session(&state, id, |c| c.open_picker(req.target)).await
}

/// POST /v1/sessions/{id}/select
async fn select_value(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(value): Json<PickedValue>,
) -> Result<Json<SessionResponse>, AppError> {
    with_session(&state, id, |c| c.select(value)).await
}

/// POST /v1/sessions/{id}/dismiss
async fn dismiss_picker(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    with_session(&state, id, |c| c.dismiss()).await
}

/// POST /v1/sessions/{id}/reset
/// Re-enter the detail view
async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let now = state.now();
    with_session(&state, id, |c| {
        c.reset(now);
        Ok(())
    })
    .await
}

/// POST /v1/sessions/{id}/confirm
/// Confirm, then hand the booking to the persistence service.
/// The session only becomes Confirmed once the booking is stored.
async fn confirm_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConfirmResponse>, AppError> {
    let mut session = lock_session(&state, id).await?;

    let mut next = session.controller.clone();
    let request = next.confirm_booking(state.now())?;
    let booking = persist_booking(&state, request).await?;
    session.controller = next;

    Ok(Json(ConfirmResponse {
        booking,
        session: respond(id, &session.controller, &state),
    }))
}

// ============================================================================
// Helpers
// ============================================================================

async fn with_session<F>(state: &AppState, id: Uuid, action: F) -> Result<Json<SessionResponse>, AppError>
where
    F: FnOnce(&mut BookingController) -> Result<(), ControllerError>,
{
    let mut session = lock_session(state, id).await?;
    action(&mut session.controller)?;
    Ok(Json(respond(id, &session.controller, state)))
}

/// Lock one session without holding the session map, refreshing its idle
/// timer. An expired session is removed and reported as missing.
async fn lock_session(state: &AppState, id: Uuid) -> Result<OwnedMutexGuard<Session>, AppError> {
    let entry = state
        .sessions
        .read()
        .await
        .get(&id)
        .cloned()
        .ok_or_else(|| session_not_found(id))?;

    let mut session = entry.lock_owned().await;
    let now = state.now();
    if session.is_expired(now, state.session_ttl) {
        drop(session);
        state.sessions.write().await.remove(&id);
        info!("Session {} expired", id);
        return Err(session_not_found(id));
    }

    session.touch(now);
    Ok(session)
}

fn respond(session_id: Uuid, controller: &BookingController, state: &AppState) -> SessionResponse {
    SessionResponse {
        session_id,
        snapshot: controller.snapshot(state.now()),
    }
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFoundError(format!("Session not found: {}", id))
}
