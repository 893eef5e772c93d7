pub mod locale;
pub mod models;

pub use locale::{Locale, UnknownLocale};
pub use models::booking::{BookingRequest, StoredBooking};
pub use models::events::BookingConfirmedEvent;
pub use models::listing::ListingRecord;
