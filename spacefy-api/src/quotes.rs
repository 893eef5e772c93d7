use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use spacefy_booking::{validate_with, BookingWindow, ValidationResult};
use spacefy_catalog::{BookingQuote, PriceDisplay};
use uuid::Uuid;
use crate::error::AppError;
use crate::listings::load_listing;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub listing_id: Uuid,
    pub window: BookingWindow,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub listing_id: Uuid,
    pub quote: Option<BookingQuote>,
    pub price: PriceDisplay,
    pub validation: ValidationResult,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/quotes", post(create_quote))
}

/// POST /v1/quotes
/// Price a window without opening a session
async fn create_quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let listing = load_listing(&state, req.listing_id).await?;

    let quote = match (listing.rate(), req.window.instants()) {
        (Some(rate), Some((check_in, check_out))) => Some(
            BookingQuote::compute(check_in, check_out, rate)
                .map_err(|e| AppError::ValidationError(e.to_string()))?,
        ),
        _ => None,
    };

    Ok(Json(QuoteResponse {
        listing_id: listing.id(),
        price: PriceDisplay::for_quote(listing.rate(), quote.as_ref(), listing.locale()),
        quote,
        validation: validate_with(&req.window, &state.policy, state.now()),
    }))
}
