//! SeaORM Entity for payments
//!
//! One row per Razorpay order id; `razorpay_payment_id` and `captured_at`
//! stay empty until signature verification succeeds.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: Option<String>,
    pub booking_reference: String,
    pub amount: Decimal,
    pub currency: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub status: String,
    pub payment_method: Option<String>,
    pub failure_reason: Option<String>,
    pub captured_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub mod status {
    pub const CREATED: &str = "created";
    pub const PENDING: &str = "pending";
    pub const CAPTURED: &str = "captured";
    pub const FAILED: &str = "failed";
    pub const CANCELLED: &str = "cancelled";
    pub const REFUNDED: &str = "refunded";
}
