//! Payment verification: the signature gate protecting booking confirmation.
//!
//! A verified callback flips the payment to `captured` and the booking to
//! `confirmed`; this service is the sole writer of those transitions.
//! Re-verifying an already-captured payment is a no-op that returns the
//! original success payload.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, Set, TransactionTrait,
};

use crate::config::AppConfig;
use crate::entities::{bookings, payments, prelude::*};
use crate::error::ApiError;
use crate::models::payment::VerifyPaymentRequest;
use crate::services::razorpay::verify_payment_signature;

#[derive(Debug, Clone)]
pub struct VerifiedPayment {
    pub booking_id: i32,
    pub booking_reference: String,
    pub razorpay_payment_id: String,
}

pub async fn verify_and_capture(
    db: &DatabaseConnection,
    config: &AppConfig,
    request: &VerifyPaymentRequest,
) -> Result<VerifiedPayment, ApiError> {
    if !verify_payment_signature(
        &request.razorpay_order_id,
        &request.razorpay_payment_id,
        &request.razorpay_signature,
        &config.razorpay_key_secret,
    ) {
        tracing::warn!(
            order_id = %request.razorpay_order_id,
            "Payment signature verification failed"
        );
        return Err(ApiError::SignatureMismatch);
    }

    let payment = Payments::find()
        .filter(payments::Column::RazorpayOrderId.eq(&request.razorpay_order_id))
        .one(db)
        .await
        .map_err(|e| ApiError::Persistence(format!("Payment lookup failed: {}", e)))?
        .ok_or_else(|| ApiError::NotFound("Payment record not found".to_string()))?;

    let booking_reference = payment.booking_reference.clone();

    // Repeated callback with valid inputs: state is already final.
    if payment.status == payments::status::CAPTURED {
        let booking = find_booking(db, &booking_reference).await?;
        return Ok(VerifiedPayment {
            booking_id: booking.id,
            booking_reference,
            razorpay_payment_id: request.razorpay_payment_id.clone(),
        });
    }

    let now = Utc::now().fixed_offset();

    // Capture and confirmation land together or not at all; a crash between
    // the two writes must not strand a captured payment on a pending booking.
    let txn = db
        .begin()
        .await
        .map_err(|e| ApiError::Persistence(format!("Transaction begin failed: {}", e)))?;

    let mut payment_update = payment.into_active_model();
    payment_update.status = Set(payments::status::CAPTURED.to_string());
    payment_update.razorpay_payment_id = Set(Some(request.razorpay_payment_id.clone()));
    payment_update.captured_at = Set(Some(now));
    payment_update.updated_at = Set(now);
    payment_update
        .update(&txn)
        .await
        .map_err(|e| ApiError::Persistence(format!("Payment capture failed: {}", e)))?;

    let booking = find_booking(&txn, &booking_reference).await?;
    let booking_id = booking.id;

    let mut booking_update = booking.into_active_model();
    booking_update.status = Set(bookings::status::CONFIRMED.to_string());
    booking_update.updated_at = Set(now);
    booking_update
        .update(&txn)
        .await
        .map_err(|e| ApiError::Persistence(format!("Booking confirmation failed: {}", e)))?;

    txn.commit()
        .await
        .map_err(|e| ApiError::Persistence(format!("Transaction commit failed: {}", e)))?;

    tracing::info!(
        booking_reference = %booking_reference,
        payment_id = %request.razorpay_payment_id,
        "Payment captured and booking confirmed"
    );

    Ok(VerifiedPayment {
        booking_id,
        booking_reference,
        razorpay_payment_id: request.razorpay_payment_id.clone(),
    })
}

async fn find_booking<C: ConnectionTrait>(
    db: &C,
    reference: &str,
) -> Result<bookings::Model, ApiError> {
    Bookings::find()
        .filter(bookings::Column::BookingReference.eq(reference))
        .one(db)
        .await
        .map_err(|e| ApiError::Persistence(format!("Booking lookup failed: {}", e)))?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::config::Environment;
    use crate::services::razorpay::payment_signature;

    const SECRET: &str = "rzp_test_secret";

    fn test_config() -> AppConfig {
        AppConfig {
            database_url: "postgres://unused".to_string(),
            razorpay_key_id: "rzp_test_key".to_string(),
            razorpay_key_secret: SECRET.to_string(),
            min_payment_amount: Decimal::from(500),
            max_payment_amount: Decimal::from(500_000),
            currency: "INR".to_string(),
            environment: Environment::Development,
            port: 3000,
        }
    }

    fn payment_row(status: &str) -> payments::Model {
        let now = Utc::now().fixed_offset();
        payments::Model {
            id: 7,
            razorpay_order_id: "order_ABC123".to_string(),
            razorpay_payment_id: if status == payments::status::CAPTURED {
                Some("pay_XYZ789".to_string())
            } else {
                None
            },
            booking_reference: "TEST202608260042".to_string(),
            amount: Decimal::from(5000),
            currency: "INR".to_string(),
            customer_email: "jane@example.com".to_string(),
            customer_phone: "+919876543210".to_string(),
            status: status.to_string(),
            payment_method: None,
            failure_reason: None,
            captured_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn booking_row(status: &str) -> bookings::Model {
        let now = Utc::now().fixed_offset();
        bookings::Model {
            id: 42,
            booking_reference: "TEST202608260042".to_string(),
            customer_name: "Jane Doe".to_string(),
            customer_email: "jane@example.com".to_string(),
            customer_phone: "+919876543210".to_string(),
            destination_id: 3,
            amount: Decimal::from(5000),
            currency: "INR".to_string(),
            payment_type: "Booking Deposit".to_string(),
            status: status.to_string(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn valid_request() -> VerifyPaymentRequest {
        VerifyPaymentRequest {
            razorpay_order_id: "order_ABC123".to_string(),
            razorpay_payment_id: "pay_XYZ789".to_string(),
            razorpay_signature: payment_signature("order_ABC123", "pay_XYZ789", SECRET),
        }
    }

    #[tokio::test]
    async fn tampered_signature_touches_no_state() {
        // No query results appended: any DB access would error the test.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let config = test_config();

        let mut request = valid_request();
        request.razorpay_signature = payment_signature("order_ABC123", "pay_FORGED", SECRET);

        let err = verify_and_capture(&db, &config, &request).await.unwrap_err();
        assert!(matches!(err, ApiError::SignatureMismatch));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn valid_signature_captures_payment_and_confirms_booking() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![payment_row(payments::status::CREATED)]])
            .append_query_results([vec![payment_row(payments::status::CAPTURED)]])
            .append_query_results([vec![booking_row(bookings::status::PENDING)]])
            .append_query_results([vec![booking_row(bookings::status::CONFIRMED)]])
            .into_connection();
        let config = test_config();

        let verified = verify_and_capture(&db, &config, &valid_request())
            .await
            .unwrap();

        assert_eq!(verified.booking_id, 42);
        assert_eq!(verified.booking_reference, "TEST202608260042");
        assert_eq!(verified.razorpay_payment_id, "pay_XYZ789");

        // Both updates run inside one transaction.
        let log = format!("{:?}", db.into_transaction_log());
        assert_eq!(
            log.matches("UPDATE").count(),
            2,
            "exactly one payment and one booking update"
        );
    }

    #[tokio::test]
    async fn booking_confirm_failure_aborts_the_capture() {
        // Payment update succeeds, then the booking fetch comes up empty, so
        // the transaction is dropped without a commit.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![payment_row(payments::status::CREATED)]])
            .append_query_results([vec![payment_row(payments::status::CAPTURED)]])
            .append_query_results([Vec::<bookings::Model>::new()])
            .into_connection();
        let config = test_config();

        let err = verify_and_capture(&db, &config, &valid_request())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn repeated_verification_is_idempotent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![payment_row(payments::status::CAPTURED)]])
            .append_query_results([vec![booking_row(bookings::status::CONFIRMED)]])
            .into_connection();
        let config = test_config();

        let verified = verify_and_capture(&db, &config, &valid_request())
            .await
            .unwrap();

        assert_eq!(verified.booking_id, 42);
        assert_eq!(verified.razorpay_payment_id, "pay_XYZ789");

        // Two finds, zero updates.
        let log = db.into_transaction_log();
        assert!(log
            .iter()
            .all(|stmt| !format!("{:?}", stmt).contains("UPDATE")));
    }

    #[tokio::test]
    async fn missing_payment_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<payments::Model>::new()])
            .into_connection();
        let config = test_config();

        let err = verify_and_capture(&db, &config, &valid_request())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
