use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::models::payment::{
    CreateOrderRequest, CreateOrderResponse, VerifyPaymentRequest, VerifyPaymentResponse,
};
use crate::models::ErrorResponse;
use crate::services::audit::RequestMeta;
use crate::services::{order, verification};
use crate::AppState;

pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, (StatusCode, Json<ErrorResponse>)> {
    let meta = request_meta(&headers);

    let created = order::create_order(
        &state.db,
        state.gateway.as_ref(),
        &state.config,
        &payload,
        meta,
    )
    .await?;

    Ok(Json(CreateOrderResponse {
        success: true,
        razorpay_order_id: created.razorpay_order_id,
        amount: created.amount,
        currency: created.currency,
        booking_id: created.booking_id,
        booking_reference: created.booking_reference,
    }))
}

pub async fn verify_payment(
    State(state): State<AppState>,
    Json(payload): Json<VerifyPaymentRequest>,
) -> Result<Json<VerifyPaymentResponse>, (StatusCode, Json<ErrorResponse>)> {
    let verified = verification::verify_and_capture(&state.db, &state.config, &payload).await?;

    Ok(Json(VerifyPaymentResponse {
        success: true,
        booking_id: verified.booking_id,
        booking_reference: verified.booking_reference,
        payment_id: verified.razorpay_payment_id,
    }))
}

/// Client IP (first `x-forwarded-for` hop) and user agent for the audit trail.
fn request_meta(headers: &HeaderMap) -> RequestMeta {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());

    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    RequestMeta {
        ip_address,
        user_agent,
    }
}
