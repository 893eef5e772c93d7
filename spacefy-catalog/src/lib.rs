pub mod listing;
pub mod pricing;

pub use listing::{Listing, ListingSummary};
pub use pricing::{
    format_currency, parse_rate, BookingQuote, PriceDisplay, PricingError, PricingRate,
    PRICE_PENDING, PRICE_UNAVAILABLE,
};
