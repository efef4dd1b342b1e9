use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Query parameters for the booking lookup endpoint; at least one of the two
/// identifiers is required.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingQuery {
    pub id: Option<i32>,
    pub payment: Option<String>,
}

/// Flattened confirmation-page view of a confirmed booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub id: i32,
    pub booking_reference: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub amount: Decimal,
    pub currency: String,
    pub payment_type: String,
    pub notes: Option<String>,
    pub destination_name: String,
    pub destination_country: String,
    pub razorpay_payment_id: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingLookupResponse {
    pub success: bool,
    pub booking: BookingView,
}
