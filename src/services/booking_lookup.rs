//! Confirmation-page booking lookup.
//!
//! Only payment-confirmed bookings are ever exposed through this read path,
//! regardless of which identifier found them. Destination and payment
//! enrichment is best-effort and never fails the lookup.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entities::{bookings, destinations, payments, prelude::*};
use crate::error::ApiError;
use crate::models::booking::BookingView;

pub async fn lookup(
    db: &DatabaseConnection,
    booking_id: Option<i32>,
    payment_id: Option<String>,
) -> Result<BookingView, ApiError> {
    if booking_id.is_none() && payment_id.is_none() {
        return Err(ApiError::InvalidInput(
            "Provide a booking id or a payment id".to_string(),
        ));
    }

    let mut booking: Option<bookings::Model> = None;

    if let Some(id) = booking_id {
        booking = Bookings::find()
            .filter(bookings::Column::Id.eq(id))
            .filter(bookings::Column::Status.eq(bookings::status::CONFIRMED))
            .one(db)
            .await
            .map_err(|e| ApiError::Persistence(format!("Booking lookup failed: {}", e)))?;
    }

    if booking.is_none() {
        if let Some(ref pid) = payment_id {
            let payment = Payments::find()
                .filter(payments::Column::RazorpayPaymentId.eq(pid))
                .filter(payments::Column::Status.eq(payments::status::CAPTURED))
                .one(db)
                .await
                .map_err(|e| ApiError::Persistence(format!("Payment lookup failed: {}", e)))?;

            if let Some(payment) = payment {
                booking = Bookings::find()
                    .filter(bookings::Column::BookingReference.eq(&payment.booking_reference))
                    .filter(bookings::Column::Status.eq(bookings::status::CONFIRMED))
                    .one(db)
                    .await
                    .map_err(|e| {
                        ApiError::Persistence(format!("Booking lookup failed: {}", e))
                    })?;
            }
        }
    }

    let booking = booking.ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    // Best-effort enrichment. An absent destination or payment row degrades
    // the view, never the request.
    let destination = Destinations::find()
        .filter(destinations::Column::Id.eq(booking.destination_id))
        .one(db)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Destination enrichment failed: {}", e);
            None
        });

    let razorpay_payment_id = Payments::find()
        .filter(payments::Column::BookingReference.eq(&booking.booking_reference))
        .one(db)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Payment enrichment failed: {}", e);
            None
        })
        .and_then(|p| p.razorpay_payment_id);

    let (destination_name, destination_country) = match destination {
        Some(d) => (d.name, d.country),
        None => ("Unknown".to_string(), "Unknown".to_string()),
    };

    Ok(BookingView {
        id: booking.id,
        booking_reference: booking.booking_reference,
        customer_name: booking.customer_name,
        customer_email: booking.customer_email,
        customer_phone: booking.customer_phone,
        amount: booking.amount,
        currency: booking.currency,
        payment_type: booking.payment_type,
        notes: booking.notes,
        destination_name,
        destination_country,
        razorpay_payment_id,
        created_at: booking.created_at,
    })
}
