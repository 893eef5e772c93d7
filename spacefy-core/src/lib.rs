pub mod repository;
pub mod time;

pub use repository::{BookingRepository, ListingRepository};
pub use time::{compose, hours_between, CalendarDate, Instant, WallClock};

/// Repository failures. Absence is `Ok(None)`, not an error.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
