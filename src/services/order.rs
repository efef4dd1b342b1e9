//! Order creation: server-side validation, destination resolution, booking
//! reference generation, gateway order creation and persistence of the
//! pending booking/payment pair.

use chrono::Utc;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::config::{AppConfig, Environment, PRODUCTION_MIN_AMOUNT};
use crate::entities::{bookings, destinations, payments, prelude::*};
use crate::error::ApiError;
use crate::models::payment::{CreateOrderRequest, PAYMENT_TYPES};
use crate::services::audit::{self, event, AuditEntry, RequestMeta};
use crate::services::razorpay::{GatewayOrderRequest, PaymentGateway};
use crate::services::validation::{
    validate_amount, validate_email, validate_name, validate_phone,
};

/// Collision probe budget for booking reference generation. The unique index
/// on `booking_reference` backs the residual race.
const REFERENCE_RETRY_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct OrderCreated {
    pub razorpay_order_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub booking_id: i32,
    pub booking_reference: String,
}

pub async fn create_order(
    db: &DatabaseConnection,
    gateway: &dyn PaymentGateway,
    config: &AppConfig,
    request: &CreateOrderRequest,
    meta: RequestMeta,
) -> Result<OrderCreated, ApiError> {
    // Server-side re-validation; client-side checks are advisory only.
    let mut reasons: Vec<String> = [
        validate_name(&request.customer_name),
        validate_email(&request.customer_email),
        validate_phone(&request.customer_phone),
        validate_amount(
            request.amount,
            config.min_payment_amount,
            config.max_payment_amount,
        ),
    ]
    .into_iter()
    .flatten()
    .collect();

    if !PAYMENT_TYPES.contains(&request.payment_type.as_str()) {
        reasons.push(format!("Unknown payment type '{}'", request.payment_type));
    }

    if reasons.is_empty()
        && config.environment == Environment::Production
        && request.amount < Decimal::from(PRODUCTION_MIN_AMOUNT)
    {
        reasons.push(format!("Amount must be at least ₹{}", PRODUCTION_MIN_AMOUNT));
    }

    if !reasons.is_empty() {
        let detail = reasons.join("; ");
        audit::record(
            db,
            AuditEntry::new(event::ORDER_VALIDATION_FAILED, meta)
                .contact(&request.customer_email, &request.customer_phone)
                .amount(request.amount)
                .error(detail.clone()),
        )
        .await;
        return Err(ApiError::InvalidInput(detail));
    }

    let destination = Destinations::find()
        .filter(destinations::Column::Id.eq(request.destination_id))
        .filter(destinations::Column::Status.eq("active"))
        .one(db)
        .await
        .map_err(|e| ApiError::Persistence(format!("Destination lookup failed: {}", e)))?;

    let destination = match destination {
        Some(d) => d,
        None => {
            audit::record(
                db,
                AuditEntry::new(event::DESTINATION_NOT_FOUND, meta)
                    .contact(&request.customer_email, &request.customer_phone)
                    .amount(request.amount)
                    .error(format!("No active destination with id {}", request.destination_id)),
            )
            .await;
            return Err(ApiError::UnknownDestination(
                "Invalid destination selected".to_string(),
            ));
        }
    };

    let booking_reference = unique_booking_reference(db, config).await;

    let amount_minor = (request.amount * Decimal::from(100))
        .to_u64()
        .ok_or_else(|| ApiError::InvalidInput("Amount is not representable".to_string()))?;

    let gateway_request = GatewayOrderRequest {
        amount_minor,
        currency: config.currency.clone(),
        receipt: booking_reference.clone(),
        description: format!("{} - {}", request.payment_type, destination.name),
    };

    let gateway_order = match gateway.create_order(&gateway_request).await {
        Ok(order) => order,
        Err(e) => {
            audit::record(
                db,
                AuditEntry::new(event::GATEWAY_ORDER_FAILED, meta)
                    .contact(&request.customer_email, &request.customer_phone)
                    .amount(request.amount)
                    .error(e.to_string()),
            )
            .await;
            return Err(ApiError::Upstream(e.to_string()));
        }
    };

    let now = Utc::now().fixed_offset();

    let booking = bookings::ActiveModel {
        booking_reference: Set(booking_reference.clone()),
        customer_name: Set(request.customer_name.trim().to_string()),
        customer_email: Set(request.customer_email.trim().to_string()),
        customer_phone: Set(request.customer_phone.trim().to_string()),
        destination_id: Set(destination.id),
        amount: Set(request.amount),
        currency: Set(config.currency.clone()),
        payment_type: Set(request.payment_type.clone()),
        status: Set(bookings::status::PENDING.to_string()),
        notes: Set(request.notes.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let booking = match booking.insert(db).await {
        Ok(b) => b,
        Err(e) => {
            audit::record(
                db,
                AuditEntry::new(event::BOOKING_INSERT_FAILED, meta)
                    .contact(&request.customer_email, &request.customer_phone)
                    .amount(request.amount)
                    .order_id(&gateway_order.id)
                    .error(e.to_string()),
            )
            .await;
            tracing::error!("Booking insert failed: {}", e);
            return Err(ApiError::Persistence("Failed to save booking".to_string()));
        }
    };

    let payment = payments::ActiveModel {
        razorpay_order_id: Set(gateway_order.id.clone()),
        booking_reference: Set(booking_reference.clone()),
        amount: Set(request.amount),
        currency: Set(config.currency.clone()),
        customer_email: Set(request.customer_email.trim().to_string()),
        customer_phone: Set(request.customer_phone.trim().to_string()),
        status: Set(payments::status::CREATED.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    if let Err(e) = payment.insert(db).await {
        audit::record(
            db,
            AuditEntry::new(event::PAYMENT_INSERT_FAILED, meta)
                .contact(&request.customer_email, &request.customer_phone)
                .amount(request.amount)
                .order_id(&gateway_order.id)
                .error(e.to_string()),
        )
        .await;
        tracing::error!("Payment insert failed: {}", e);
        return Err(ApiError::Persistence(
            "Failed to save payment record".to_string(),
        ));
    }

    audit::record(
        db,
        AuditEntry::new(event::ORDER_CREATED, meta)
            .contact(&request.customer_email, &request.customer_phone)
            .amount(request.amount)
            .order_id(&gateway_order.id),
    )
    .await;

    Ok(OrderCreated {
        razorpay_order_id: gateway_order.id,
        amount: request.amount,
        currency: gateway_order.currency,
        booking_id: booking.id,
        booking_reference,
    })
}

/// `{ENV}{YYYYMMDD}{4-digit zero-padded random}`, e.g. `LIVE202608260042`.
pub fn generate_booking_reference(config: &AppConfig) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    format!(
        "{}{}{:04}",
        config.environment.reference_prefix(),
        Utc::now().format("%Y%m%d"),
        suffix
    )
}

/// Generate a reference and probe for a collision, regenerating up to
/// `REFERENCE_RETRY_LIMIT` times. The probe is best-effort; probe errors do
/// not abort order creation since the unique index catches the worst case.
async fn unique_booking_reference(db: &DatabaseConnection, config: &AppConfig) -> String {
    let mut candidate = generate_booking_reference(config);
    for _ in 0..REFERENCE_RETRY_LIMIT {
        match Bookings::find()
            .filter(bookings::Column::BookingReference.eq(&candidate))
            .one(db)
            .await
        {
            Ok(None) => return candidate,
            Ok(Some(_)) => {
                tracing::warn!(reference = %candidate, "Booking reference collision, regenerating");
                candidate = generate_booking_reference(config);
            }
            Err(e) => {
                tracing::warn!("Booking reference probe failed: {}", e);
                return candidate;
            }
        }
    }
    candidate
}
