use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload handed to the booking persistence service once a booking is confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub listing_id: Uuid,
    pub check_in: NaiveDateTime,
    pub check_out: NaiveDateTime,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBooking {
    pub id: Uuid,
    #[serde(flatten)]
    pub request: BookingRequest,
    pub created_at: DateTime<Utc>,
}

impl StoredBooking {
    pub fn new(request: BookingRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_booking_request_wire_shape() {
        let json = r#"
            {
                "listingId": "6f1c3f0e-8d53-4d0a-9b7c-2b8f7c1d2e3f",
                "checkIn": "2024-06-01T10:00:00",
                "checkOut": "2024-06-01T12:00:00",
                "total": "4000.00"
            }
        "#;
        let req: BookingRequest = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(req.total, Decimal::from_str("4000.00").unwrap());
        assert_eq!(req.check_in.to_string(), "2024-06-01 10:00:00");

        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("listingId").is_some());
        assert!(value.get("checkOut").is_some());
    }
}
