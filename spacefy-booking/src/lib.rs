pub mod controller;
pub mod validator;
pub mod window;

pub use controller::{BookingController, ConfirmationState, ControllerError, ControllerSnapshot};
pub use validator::{validate, validate_span, validate_with, BookingPolicy, ValidationResult};
pub use window::{BookingWindow, PickedValue, PickerTarget};
