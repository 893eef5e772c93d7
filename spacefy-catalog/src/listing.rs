use serde::Serialize;
use spacefy_shared::{ListingRecord, Locale};
use uuid::Uuid;
use crate::pricing::{PricingError, PricingRate};

/// A listing with its display price already interpreted.
#[derive(Debug, Clone)]
pub struct Listing {
    pub record: ListingRecord,
    rate: Result<PricingRate, PricingError>,
}

impl Listing {
    pub fn from_record(record: ListingRecord) -> Self {
        let rate = PricingRate::from_display(&record.display_price, record.locale);
        if let Err(e) = &rate {
            tracing::warn!("Listing {} has an unreadable price: {}", record.id, e);
        }
        Self { record, rate }
    }

    pub fn id(&self) -> Uuid {
        self.record.id
    }

    pub fn locale(&self) -> Locale {
        self.record.locale
    }

    /// `None` when the price could not be parsed ("rate unknown").
    pub fn rate(&self) -> Option<&PricingRate> {
        self.rate.as_ref().ok()
    }

    pub fn rate_result(&self) -> Result<PricingRate, PricingError> {
        self.rate.clone()
    }

    pub fn summary(&self) -> ListingSummary {
        ListingSummary {
            id: self.record.id,
            title: self.record.title.clone(),
            display_price: self.record.display_price.clone(),
            locale: self.record.locale,
            rate_per_hour: self.rate().map(|r| r.amount_per_hour),
            formatted_rate: self.rate().map(|r| r.formatted()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingSummary {
    pub id: Uuid,
    pub title: String,
    pub display_price: String,
    pub locale: Locale,
    pub rate_per_hour: Option<rust_decimal::Decimal>,
    pub formatted_rate: Option<String>,
}
