use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw listing data as supplied by the listing provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: Uuid,
    pub title: String,
    /// Price per hour exactly as displayed, e.g. `"R$ 2.000"`.
    pub display_price: String,
    #[serde(default)]
    pub locale: Locale,
}
