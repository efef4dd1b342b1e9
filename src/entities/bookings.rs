//! SeaORM Entity for bookings
//!
//! Status lifecycle: pending -> confirmed | cancelled | completed.
//! `booking_reference` carries a unique index; the human-facing format is
//! `{ENV}{YYYYMMDD}{4-digit-random}`, e.g. LIVE202608100042.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub booking_reference: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub destination_id: i32,
    pub amount: Decimal,
    pub currency: String,
    pub payment_type: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub mod status {
    pub const PENDING: &str = "pending";
    pub const CONFIRMED: &str = "confirmed";
    pub const CANCELLED: &str = "cancelled";
    pub const COMPLETED: &str = "completed";
}
