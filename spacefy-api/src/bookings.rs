use std::convert::Infallible;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use spacefy_booking::validate_span;
use spacefy_catalog::BookingQuote;
use spacefy_shared::{BookingConfirmedEvent, BookingRequest, StoredBooking};
use tokio_stream::wrappers::BroadcastStream;
use tracing::info;
use uuid::Uuid;
use crate::error::AppError;
use crate::listings::load_listing;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BookingFilter {
    pub listing_id: Option<Uuid>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", get(list_bookings).post(create_booking))
        .route("/v1/bookings/{id}", get(get_booking))
        .route("/v1/listings/{id}/bookings/stream", get(booking_stream))
}

/// Store a confirmed booking and announce it to stream subscribers
pub(crate) async fn persist_booking(
    state: &AppState,
    request: BookingRequest,
) -> Result<StoredBooking, AppError> {
    let stored = state.bookings.save_booking(request).await?;

    let event = BookingConfirmedEvent {
        booking_id: stored.id,
        listing_id: stored.request.listing_id,
        check_in: stored.request.check_in,
        check_out: stored.request.check_out,
        total: stored.request.total,
        timestamp: chrono::Utc::now().timestamp(),
    };
    // No subscribers is fine
    let _ = state.events_tx.send(event);

    info!("Booking persisted: {}", stored.id);
    Ok(stored)
}

/// POST /v1/bookings
/// Booking persistence service: `{listingId, checkIn, checkOut, total}`.
/// The window must pass the booking policy and the total must match the
/// listing's rate.
async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<BookingRequest>,
) -> Result<(StatusCode, Json<StoredBooking>), AppError> {
    let listing = load_listing(&state, req.listing_id).await?;
    let rate = listing
        .rate()
        .ok_or_else(|| AppError::ConflictError("Price unavailable".to_string()))?;

    let result = validate_span(req.check_in, req.check_out, &state.policy, state.now());
    if !result.is_valid() {
        return Err(AppError::BookingRejected(result));
    }

    let expected = BookingQuote::compute(req.check_in, req.check_out, rate)
        .map_err(|e| AppError::ValidationError(e.to_string()))?
        .rounded_total();
    if req.total != expected {
        return Err(AppError::ValidationError(format!(
            "Total {} does not match the quoted {}",
            req.total, expected
        )));
    }

    let stored = persist_booking(&state, req).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /v1/bookings?listing_id=
async fn list_bookings(
    State(state): State<AppState>,
    Query(filter): Query<BookingFilter>,
) -> Result<Json<Vec<StoredBooking>>, AppError> {
    Ok(Json(state.bookings.list_bookings(filter.listing_id).await?))
}

/// GET /v1/bookings/{id}
async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredBooking>, AppError> {
    state
        .bookings
        .get_booking(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("Booking not found: {}", id)))
}

/// GET /v1/listings/{id}/bookings/stream
/// Server-sent events for confirmations on one listing
async fn booking_stream(
    State(state): State<AppState>,
    Path(listing_id): Path<Uuid>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events_tx.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(move |result| async move {
        match result {
            Ok(event) if event.listing_id == listing_id => {
                Event::default().event("booking_confirmed").json_data(&event).ok().map(Ok)
            }
            _ => None,
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
