use async_trait::async_trait;
use spacefy_core::{BookingRepository, CoreError, CoreResult, ListingRepository};
use spacefy_shared::{BookingRequest, ListingRecord, StoredBooking};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Listing provider backed by a map, seeded from configuration
#[derive(Default)]
pub struct InMemoryListingRepository {
    listings: RwLock<HashMap<Uuid, ListingRecord>>,
}

impl InMemoryListingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listings(listings: impl IntoIterator<Item = ListingRecord>) -> Self {
        let map = listings.into_iter().map(|l| (l.id, l)).collect();
        Self {
            listings: RwLock::new(map),
        }
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn get_listing(&self, id: Uuid) -> CoreResult<Option<ListingRecord>> {
        Ok(self.listings.read().await.get(&id).cloned())
    }

    async fn list_listings(&self) -> CoreResult<Vec<ListingRecord>> {
        let mut listings: Vec<ListingRecord> = self.listings.read().await.values().cloned().collect();
        listings.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(listings)
    }

    async fn save_listing(&self, listing: ListingRecord) -> CoreResult<()> {
        if listing.title.trim().is_empty() {
            return Err(CoreError::ValidationError("Listing title is required".to_string()));
        }
        info!("Listing saved: {} ({})", listing.id, listing.title);
        self.listings.write().await.insert(listing.id, listing);
        Ok(())
    }
}

/// Booking persistence kept in process memory
#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<Vec<StoredBooking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn save_booking(&self, request: BookingRequest) -> CoreResult<StoredBooking> {
        if request.check_out <= request.check_in {
            return Err(CoreError::ValidationError(
                "check-out must be after check-in".to_string(),
            ));
        }
        if request.total.is_sign_negative() {
            return Err(CoreError::ValidationError("total must not be negative".to_string()));
        }

        let stored = StoredBooking::new(request);
        info!("Booking stored: {} for listing {}", stored.id, stored.request.listing_id);
        self.bookings.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn get_booking(&self, id: Uuid) -> CoreResult<Option<StoredBooking>> {
        Ok(self.bookings.read().await.iter().find(|b| b.id == id).cloned())
    }

    async fn list_bookings(&self, listing_id: Option<Uuid>) -> CoreResult<Vec<StoredBooking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .iter()
            .filter(|b| listing_id.map_or(true, |id| b.request.listing_id == id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;
    use spacefy_shared::Locale;

    fn instant(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn request(listing_id: Uuid, from: &str, to: &str) -> BookingRequest {
        BookingRequest {
            listing_id,
            check_in: instant(from),
            check_out: instant(to),
            total: dec!(4000.00),
        }
    }

    #[tokio::test]
    async fn test_save_and_filter_bookings() {
        let repo = InMemoryBookingRepository::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let stored = repo
            .save_booking(request(a, "2024-06-01 10:00", "2024-06-01 12:00"))
            .await
            .unwrap();
        repo.save_booking(request(b, "2024-06-02 10:00", "2024-06-02 11:00"))
            .await
            .unwrap();

        assert_eq!(repo.list_bookings(None).await.unwrap().len(), 2);
        let for_a = repo.list_bookings(Some(a)).await.unwrap();
        assert_eq!(for_a.len(), 1);
        assert_eq!(for_a[0].id, stored.id);
        assert!(repo.get_booking(stored.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rejects_non_positive_window() {
        let repo = InMemoryBookingRepository::new();
        let result = repo
            .save_booking(request(Uuid::new_v4(), "2024-06-01 10:00", "2024-06-01 09:00"))
            .await;
        assert!(matches!(result, Err(CoreError::ValidationError(_))));
        assert!(repo.list_bookings(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listing_repository_round_trip() {
        let id = Uuid::new_v4();
        let repo = InMemoryListingRepository::with_listings(vec![ListingRecord {
            id,
            title: "Coworking Centro".to_string(),
            display_price: "R$ 150".to_string(),
            locale: Locale::PtBr,
        }]);

        assert_eq!(repo.get_listing(id).await.unwrap().unwrap().display_price, "R$ 150");
        assert!(repo.get_listing(Uuid::new_v4()).await.unwrap().is_none());

        let blank = ListingRecord {
            id: Uuid::new_v4(),
            title: "  ".to_string(),
            display_price: "R$ 10".to_string(),
            locale: Locale::PtBr,
        };
        assert!(repo.save_listing(blank).await.is_err());
        assert_eq!(repo.list_listings().await.unwrap().len(), 1);
    }
}
