use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use spacefy_booking::{ControllerError, ValidationResult};
use spacefy_core::CoreError;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    BookingRejected(ValidationResult),
    NotFoundError(String),
    ConflictError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::BookingRejected(result) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": result.message().unwrap_or_default(),
                    "validation": result,
                }),
            ),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => AppError::ValidationError(msg),
        }
    }
}

impl From<ControllerError> for AppError {
    fn from(err: ControllerError) -> Self {
        match err {
            ControllerError::Rejected(result) => AppError::BookingRejected(result),
            ControllerError::PriceUnavailable => AppError::ConflictError(err.to_string()),
            ControllerError::InvalidTransition { .. } => AppError::ConflictError(err.to_string()),
            ControllerError::PickerMismatch { .. } => AppError::ValidationError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacefy_booking::PickerTarget;

    #[test]
    fn test_controller_errors_map_to_statuses() {
        let cases = [
            (ControllerError::Rejected(ValidationResult::InvalidOrdering), StatusCode::UNPROCESSABLE_ENTITY),
            (ControllerError::PriceUnavailable, StatusCode::CONFLICT),
            (
                ControllerError::InvalidTransition { from: "Confirmed".to_string(), action: "select" },
                StatusCode::CONFLICT,
            ),
            (ControllerError::PickerMismatch { target: PickerTarget::CheckInDate }, StatusCode::BAD_REQUEST),
        ];

        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_store_validation_is_bad_request() {
        let response = AppError::from(CoreError::ValidationError("total must not be negative".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
