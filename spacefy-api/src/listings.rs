use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use spacefy_catalog::{Listing, ListingSummary};
use spacefy_shared::{ListingRecord, Locale};
use uuid::Uuid;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateListingRequest {
    pub title: String,
    pub display_price: String,
    pub locale: Option<Locale>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/listings", get(list_listings).post(create_listing))
        .route("/v1/listings/{id}", get(get_listing))
}

/// Load a listing with its rate parsed, or 404
pub(crate) async fn load_listing(state: &AppState, id: Uuid) -> Result<Listing, AppError> {
    let record = state
        .listings
        .get_listing(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("Listing not found: {}", id)))?;
    Ok(Listing::from_record(record))
}

/// GET /v1/listings
async fn list_listings(State(state): State<AppState>) -> Result<Json<Vec<ListingSummary>>, AppError> {
    let listings = state.listings.list_listings().await?;
    Ok(Json(
        listings
            .into_iter()
            .map(|record| Listing::from_record(record).summary())
            .collect(),
    ))
}

/// GET /v1/listings/{id}
async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ListingSummary>, AppError> {
    Ok(Json(load_listing(&state, id).await?.summary()))
}

/// POST /v1/listings
/// Register a listing. An unreadable price is accepted and shown as unavailable.
async fn create_listing(
    State(state): State<AppState>,
    Json(req): Json<CreateListingRequest>,
) -> Result<(StatusCode, Json<ListingSummary>), AppError> {
    let record = ListingRecord {
        id: Uuid::new_v4(),
        title: req.title,
        display_price: req.display_price,
        locale: req.locale.unwrap_or(state.default_locale),
    };
    state.listings.save_listing(record.clone()).await?;
    Ok((StatusCode::CREATED, Json(Listing::from_record(record).summary())))
}
