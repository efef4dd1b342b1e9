//! Razorpay Orders API client and checkout signature verification.
//!
//! The client is constructed once and injected through `AppState`; nothing
//! here holds process-global state. Signature verification implements the
//! documented checkout scheme: HMAC-SHA256 over `"{order_id}|{payment_id}"`
//! keyed with the API secret, hex-encoded.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const RAZORPAY_API_BASE: &str = "https://api.razorpay.com/v1";
const GATEWAY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct GatewayError(pub String);

/// Order-creation request as the gateway sees it: amount in minor units
/// (paise), receipt carrying the booking reference.
#[derive(Debug, Clone)]
pub struct GatewayOrderRequest {
    pub amount_minor: u64,
    pub currency: String,
    pub receipt: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: u64,
    pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: &GatewayOrderRequest) -> Result<GatewayOrder, GatewayError>;
}

#[derive(Clone)]
pub struct RazorpayClient {
    client: Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

impl RazorpayClient {
    pub fn new(key_id: String, key_secret: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(GATEWAY_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            key_id,
            key_secret,
            base_url: RAZORPAY_API_BASE.to_string(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(&self, request: &GatewayOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let body = json!({
            "amount": request.amount_minor,
            "currency": request.currency,
            "receipt": request.receipt,
            "notes": {
                "description": request.description,
            },
        });

        let response = self
            .client
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError(format!("Order request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError(format!(
                "Order creation returned {}: {}",
                status, detail
            )));
        }

        response
            .json::<GatewayOrder>()
            .await
            .map_err(|e| GatewayError(format!("Order response decode failed: {}", e)))
    }
}

/// Compute the checkout signature for an order/payment pair.
pub fn payment_signature(order_id: &str, payment_id: &str, secret: &str) -> String {
    let payload = format!("{}|{}", order_id, payment_id);
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a checkout callback signature. Malformed or missing input never
/// verifies; comparison is constant-time over the decoded bytes.
pub fn verify_payment_signature(
    order_id: &str,
    payment_id: &str,
    supplied_signature: &str,
    secret: &str,
) -> bool {
    if order_id.is_empty() || payment_id.is_empty() || supplied_signature.is_empty() {
        return false;
    }

    let expected = payment_signature(order_id, payment_id, secret);

    let supplied_bytes = match hex::decode(supplied_signature) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let expected_bytes = match hex::decode(&expected) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    if supplied_bytes.len() != expected_bytes.len() {
        return false;
    }

    let mut diff = 0u8;
    for (a, b) in supplied_bytes.iter().zip(expected_bytes.iter()) {
        diff |= a ^ b;
    }
    diff == 0
}

/// Scripted gateway for tests: records calls, optionally fails.
#[derive(Clone, Default)]
pub struct MockGateway {
    pub should_fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_order(&self, request: &GatewayOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(GatewayError("gateway unavailable".to_string()));
        }
        Ok(GatewayOrder {
            id: format!("order_mock{:06}", call),
            amount: request.amount_minor,
            currency: request.currency.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key";

    #[test]
    fn signature_round_trip_verifies() {
        let sig = payment_signature("order_ABC123", "pay_XYZ789", SECRET);
        assert!(verify_payment_signature(
            "order_ABC123",
            "pay_XYZ789",
            &sig,
            SECRET
        ));
    }

    #[test]
    fn tampered_signature_fails() {
        let sig = payment_signature("order_ABC123", "pay_XYZ789", SECRET);
        // Flip one hex character.
        let mut tampered: Vec<char> = sig.chars().collect();
        tampered[0] = if tampered[0] == '0' { '1' } else { '0' };
        let tampered: String = tampered.into_iter().collect();
        assert!(!verify_payment_signature(
            "order_ABC123",
            "pay_XYZ789",
            &tampered,
            SECRET
        ));
    }

    #[test]
    fn signature_binds_both_identifiers() {
        let sig = payment_signature("order_ABC123", "pay_XYZ789", SECRET);
        assert!(!verify_payment_signature("order_OTHER", "pay_XYZ789", &sig, SECRET));
        assert!(!verify_payment_signature("order_ABC123", "pay_OTHER", &sig, SECRET));
    }

    #[test]
    fn malformed_input_never_verifies() {
        let sig = payment_signature("order_ABC123", "pay_XYZ789", SECRET);
        assert!(!verify_payment_signature("", "pay_XYZ789", &sig, SECRET));
        assert!(!verify_payment_signature("order_ABC123", "", &sig, SECRET));
        assert!(!verify_payment_signature("order_ABC123", "pay_XYZ789", "", SECRET));
        assert!(!verify_payment_signature(
            "order_ABC123",
            "pay_XYZ789",
            "not-hex-at-all",
            SECRET
        ));
        assert!(!verify_payment_signature(
            "order_ABC123",
            "pay_XYZ789",
            "deadbeef",
            SECRET
        ));
    }

    #[test]
    fn wrong_secret_fails() {
        let sig = payment_signature("order_ABC123", "pay_XYZ789", SECRET);
        assert!(!verify_payment_signature(
            "order_ABC123",
            "pay_XYZ789",
            &sig,
            "another_secret"
        ));
    }

    #[tokio::test]
    async fn mock_gateway_counts_calls() {
        let gateway = MockGateway::new();
        let request = GatewayOrderRequest {
            amount_minor: 500_000,
            currency: "INR".to_string(),
            receipt: "TEST202608100001".to_string(),
            description: "Booking Deposit - Bali".to_string(),
        };
        let order = gateway.create_order(&request).await.unwrap();
        assert_eq!(order.amount, 500_000);
        assert_eq!(gateway.call_count(), 1);

        let failing = MockGateway::failing();
        assert!(failing.create_order(&request).await.is_err());
        assert_eq!(failing.call_count(), 1);
    }
}
