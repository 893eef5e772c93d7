use async_trait::async_trait;
use spacefy_shared::{BookingRequest, ListingRecord, StoredBooking};
use uuid::Uuid;
use crate::CoreResult;

/// Repository trait for listing data access
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn get_listing(&self, id: Uuid) -> CoreResult<Option<ListingRecord>>;

    async fn list_listings(&self) -> CoreResult<Vec<ListingRecord>>;

    async fn save_listing(&self, listing: ListingRecord) -> CoreResult<()>;
}

/// Repository trait for confirmed bookings
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a confirmed booking
    async fn save_booking(&self, request: BookingRequest) -> CoreResult<StoredBooking>;

    async fn get_booking(&self, id: Uuid) -> CoreResult<Option<StoredBooking>>;

    async fn list_bookings(&self, listing_id: Option<Uuid>) -> CoreResult<Vec<StoredBooking>>;
}
