use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingConfirmedEvent {
    pub booking_id: Uuid,
    pub listing_id: Uuid,
    pub check_in: chrono::NaiveDateTime,
    pub check_out: chrono::NaiveDateTime,
    pub total: Decimal,
    pub timestamp: i64,
}
