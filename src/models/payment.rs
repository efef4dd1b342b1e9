use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Accepted values for the quick-payment `paymentType` field.
pub const PAYMENT_TYPES: &[&str] = &[
    "Booking Deposit",
    "Balance Payment",
    "Full Package Payment",
    "Advance Payment",
    "Other",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub destination_id: i32,
    pub amount: Decimal,
    pub payment_type: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub razorpay_order_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub booking_id: i32,
    pub booking_reference: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub booking_id: i32,
    pub booking_reference: String,
    pub payment_id: String,
}
