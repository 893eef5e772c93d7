use serde::Serialize;
use spacefy_catalog::{BookingQuote, Listing, PriceDisplay, PricingRate};
use spacefy_core::Instant;
use spacefy_shared::{BookingRequest, Locale};
use uuid::Uuid;
use crate::validator::{validate_with, BookingPolicy, ValidationResult};
use crate::window::{BookingWindow, PickedValue, PickerTarget};

/// Confirmation state of one open detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "target", rename_all = "snake_case")]
pub enum ConfirmationState {
    Idle,
    PickerOpen(PickerTarget),
    Confirmed,
}

/// Drives picker interaction and booking confirmation for a single listing view.
///
/// The controller never rejects a picked value for producing an invalid
/// window; validation only gates `confirm_booking`.
#[derive(Debug, Clone)]
pub struct BookingController {
    listing_id: Uuid,
    rate: Option<PricingRate>,
    locale: Locale,
    policy: BookingPolicy,
    window: BookingWindow,
    state: ConfirmationState,
    quote: Option<BookingQuote>,
    confirmed: Option<BookingRequest>,
}

impl BookingController {
    pub fn new(
        listing_id: Uuid,
        rate: Option<PricingRate>,
        locale: Locale,
        policy: BookingPolicy,
        window: BookingWindow,
    ) -> Self {
        let mut controller = Self {
            listing_id,
            rate,
            locale,
            policy,
            window,
            state: ConfirmationState::Idle,
            quote: None,
            confirmed: None,
        };
        controller.refresh_quote();
        controller
    }

    /// Open a detail view on `listing`, all four fields seeded with `now`.
    pub fn open(listing: &Listing, policy: BookingPolicy, now: Instant) -> Self {
        Self::new(
            listing.id(),
            listing.rate().copied(),
            listing.locale(),
            policy,
            BookingWindow::seeded(now),
        )
    }

    pub fn listing_id(&self) -> Uuid {
        self.listing_id
    }

    pub fn state(&self) -> ConfirmationState {
        self.state
    }

    pub fn window(&self) -> &BookingWindow {
        &self.window
    }

    pub fn policy(&self) -> &BookingPolicy {
        &self.policy
    }

    /// Live quote, `None` while the window is incomplete or the rate is unknown.
    pub fn quote(&self) -> Option<&BookingQuote> {
        self.quote.as_ref()
    }

    pub fn price_display(&self) -> PriceDisplay {
        PriceDisplay::for_quote(self.rate.as_ref(), self.quote.as_ref(), self.locale)
    }

    /// The payload captured on confirmation.
    pub fn confirmed(&self) -> Option<&BookingRequest> {
        self.confirmed.as_ref()
    }

    /// Transition: Idle → PickerOpen(target)
    pub fn open_picker(&mut self, target: PickerTarget) -> Result<(), ControllerError> {
        if self.state != ConfirmationState::Idle {
            return Err(self.invalid_transition("open_picker"));
        }
        self.state = ConfirmationState::PickerOpen(target);
        Ok(())
    }

    /// Transition: PickerOpen(target) → Idle, writing `value` into the window
    pub fn select(&mut self, value: PickedValue) -> Result<(), ControllerError> {
        let ConfirmationState::PickerOpen(target) = self.state else {
            return Err(self.invalid_transition("select"));
        };

        let window = self
            .window
            .with_value(target, value)
            .ok_or(ControllerError::PickerMismatch { target })?;

        self.window = window;
        self.state = ConfirmationState::Idle;
        self.refresh_quote();
        Ok(())
    }

    /// Transition: PickerOpen → Idle, window untouched
    pub fn dismiss(&mut self) -> Result<(), ControllerError> {
        if !matches!(self.state, ConfirmationState::PickerOpen(_)) {
            return Err(self.invalid_transition("dismiss"));
        }
        self.state = ConfirmationState::Idle;
        Ok(())
    }

    /// Transition: Idle → Confirmed, only for a valid window with a known price
    pub fn confirm_booking(&mut self, now: Instant) -> Result<BookingRequest, ControllerError> {
        if self.state != ConfirmationState::Idle {
            return Err(self.invalid_transition("confirm_booking"));
        }

        let result = self.validation(now);
        if !result.is_valid() {
            tracing::warn!("Booking refused for listing {}: {:?}", self.listing_id, result);
            return Err(ControllerError::Rejected(result));
        }

        let (Some(quote), Some((check_in, check_out))) = (self.quote, self.window.instants()) else {
            tracing::warn!("Booking refused for listing {}: price unavailable", self.listing_id);
            return Err(ControllerError::PriceUnavailable);
        };

        let request = BookingRequest {
            listing_id: self.listing_id,
            check_in,
            check_out,
            total: quote.rounded_total(),
        };

        self.state = ConfirmationState::Confirmed;
        self.confirmed = Some(request.clone());
        tracing::info!(
            "Booking confirmed for listing {}: {} hours, total {}",
            self.listing_id,
            quote.duration_hours.normalize(),
            request.total
        );
        Ok(request)
    }

    /// Re-enter the detail view: back to Idle with a fresh seeded window.
    pub fn reset(&mut self, now: Instant) {
        self.window = BookingWindow::seeded(now);
        self.state = ConfirmationState::Idle;
        self.confirmed = None;
        self.refresh_quote();
    }

    pub fn validation(&self, now: Instant) -> ValidationResult {
        validate_with(&self.window, &self.policy, now)
    }

    pub fn snapshot(&self, now: Instant) -> ControllerSnapshot {
        ControllerSnapshot {
            listing_id: self.listing_id,
            state: self.state,
            window: self.window,
            quote: self.quote,
            price: self.price_display(),
            validation: self.validation(now),
            confirmed: self.confirmed.clone(),
        }
    }

    fn refresh_quote(&mut self) {
        self.quote = match (self.rate.as_ref(), self.window.instants()) {
            (Some(rate), Some((check_in, check_out))) => {
                match BookingQuote::compute(check_in, check_out, rate) {
                    Ok(quote) => Some(quote),
                    Err(e) => {
                        tracing::warn!("Quote for listing {} failed: {}", self.listing_id, e);
                        None
                    }
                }
            }
            _ => None,
        };
        tracing::debug!("Quote for listing {} recomputed: {:?}", self.listing_id, self.quote);
    }

    fn invalid_transition(&self, action: &'static str) -> ControllerError {
        ControllerError::InvalidTransition {
            from: format!("{:?}", self.state),
            action,
        }
    }
}

/// Everything the presentation layer observes after a transition.
#[derive(Debug, Clone, Serialize)]
pub struct ControllerSnapshot {
    pub listing_id: Uuid,
    pub state: ConfirmationState,
    pub window: BookingWindow,
    pub quote: Option<BookingQuote>,
    pub price: PriceDisplay,
    pub validation: ValidationResult,
    pub confirmed: Option<BookingRequest>,
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("Invalid transition: cannot {action} from {from}")]
    InvalidTransition {
        from: String,
        action: &'static str,
    },

    #[error("Picked value does not fit {target:?}")]
    PickerMismatch { target: PickerTarget },

    #[error("Booking window rejected: {0:?}")]
    Rejected(ValidationResult),

    #[error("Price unavailable")]
    PriceUnavailable,
}
