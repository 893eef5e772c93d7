use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spacefy_core::{hours_between, Instant};
use crate::window::BookingWindow;

/// Limits a booking window must respect before it can be confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookingPolicy {
    /// Shortest bookable window. Zero accepts any positive duration.
    #[serde(default)]
    pub minimum_duration_minutes: u32,
    /// How far ahead of `now` a check-in may be placed.
    #[serde(default)]
    pub max_advance_days: Option<u32>,
}

impl BookingPolicy {
    pub fn minimum_hours(&self) -> Decimal {
        Decimal::from(self.minimum_duration_minutes) / Decimal::from(60)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ValidationResult {
    /// At least one of the four values has not been picked.
    Unset,
    Valid { duration_hours: Decimal },
    InvalidOrdering,
    BelowMinimumDuration { minimum_hours: Decimal },
    BeyondBookingHorizon { max_advance_days: u32 },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid { .. })
    }

    pub fn duration_hours(&self) -> Option<Decimal> {
        match self {
            ValidationResult::Valid { duration_hours } => Some(*duration_hours),
            _ => None,
        }
    }

    /// User-facing explanation, `None` when the window is valid.
    pub fn message(&self) -> Option<String> {
        match self {
            ValidationResult::Valid { .. } => None,
            ValidationResult::Unset => {
                Some("pick check-in and check-out dates and times".to_string())
            }
            ValidationResult::InvalidOrdering => {
                Some("check-out must be after check-in".to_string())
            }
            ValidationResult::BelowMinimumDuration { minimum_hours } => Some(format!(
                "bookings must last at least {} hour(s)",
                minimum_hours.normalize()
            )),
            ValidationResult::BeyondBookingHorizon { max_advance_days } => Some(format!(
                "check-in must be within {} days from now",
                max_advance_days
            )),
        }
    }
}

/// Checks ordering only: `Valid` iff check-out is strictly after check-in.
pub fn validate(window: &BookingWindow) -> ValidationResult {
    match window.instants() {
        Some((check_in, check_out)) => check_ordering(check_in, check_out),
        None => ValidationResult::Unset,
    }
}

/// Checks ordering, then the policy's minimum duration and booking horizon.
pub fn validate_with(window: &BookingWindow, policy: &BookingPolicy, now: Instant) -> ValidationResult {
    match window.instants() {
        Some((check_in, check_out)) => validate_span(check_in, check_out, policy, now),
        None => ValidationResult::Unset,
    }
}

/// Policy checks on an already composed check-in/check-out pair.
pub fn validate_span(check_in: Instant, check_out: Instant, policy: &BookingPolicy, now: Instant) -> ValidationResult {
    let result = check_ordering(check_in, check_out);
    let Some(duration_hours) = result.duration_hours() else {
        return result;
    };

    let minimum_hours = policy.minimum_hours();
    if duration_hours < minimum_hours {
        return ValidationResult::BelowMinimumDuration { minimum_hours };
    }

    // A horizon past the calendar's end never binds
    if let Some(days) = policy.max_advance_days {
        let horizon = Duration::try_days(i64::from(days)).and_then(|span| now.checked_add_signed(span));
        if horizon.is_some_and(|horizon| check_in > horizon) {
            return ValidationResult::BeyondBookingHorizon { max_advance_days: days };
        }
    }

    result
}

fn check_ordering(check_in: Instant, check_out: Instant) -> ValidationResult {
    let duration_hours = hours_between(check_in, check_out);
    if duration_hours <= Decimal::ZERO {
        ValidationResult::InvalidOrdering
    } else {
        ValidationResult::Valid { duration_hours }
    }
}
