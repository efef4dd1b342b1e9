//! Append-only audit trail for order attempts.
//!
//! Writes are fire-and-forget: a failed insert is logged and discarded so
//! the payment path is never destabilized by its own observability.

use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::entities::audit_logs;

pub mod event {
    pub const ORDER_VALIDATION_FAILED: &str = "order_validation_failed";
    pub const DESTINATION_NOT_FOUND: &str = "destination_not_found";
    pub const GATEWAY_ORDER_FAILED: &str = "gateway_order_failed";
    pub const BOOKING_INSERT_FAILED: &str = "booking_insert_failed";
    pub const PAYMENT_INSERT_FAILED: &str = "payment_insert_failed";
    pub const ORDER_CREATED: &str = "order_created";
}

/// Request metadata captured for the audit trail.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub event_type: &'static str,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub amount: Option<Decimal>,
    pub razorpay_order_id: Option<String>,
    pub error_message: Option<String>,
    pub meta: RequestMeta,
}

impl AuditEntry {
    pub fn new(event_type: &'static str, meta: RequestMeta) -> Self {
        Self {
            event_type,
            customer_email: None,
            customer_phone: None,
            amount: None,
            razorpay_order_id: None,
            error_message: None,
            meta,
        }
    }

    pub fn contact(mut self, email: &str, phone: &str) -> Self {
        self.customer_email = Some(mask_email(email));
        self.customer_phone = Some(mask_phone(phone));
        self
    }

    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn order_id(mut self, order_id: &str) -> Self {
        self.razorpay_order_id = Some(order_id.to_string());
        self
    }

    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

/// Persist an audit entry, swallowing any failure.
pub async fn record(db: &DatabaseConnection, entry: AuditEntry) {
    let row = audit_logs::ActiveModel {
        event_type: Set(entry.event_type.to_string()),
        customer_email: Set(entry.customer_email),
        customer_phone: Set(entry.customer_phone),
        amount: Set(entry.amount),
        razorpay_order_id: Set(entry.razorpay_order_id),
        error_message: Set(entry.error_message),
        ip_address: Set(entry.meta.ip_address),
        user_agent: Set(entry.meta.user_agent),
        ..Default::default()
    };

    if let Err(e) = row.insert(db).await {
        tracing::warn!(event_type = entry.event_type, "Audit log write failed: {}", e);
    }
}

/// `jane.doe@example.com` -> `ja***@example.com`
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let visible: String = local.chars().take(2).collect();
            format!("{}***@{}", visible, domain)
        }
        None => "***".to_string(),
    }
}

/// Keeps only the last 4 digits.
pub fn mask_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() <= 4 {
        return "***".to_string();
    }
    let tail: String = digits[digits.len() - 4..].iter().collect();
    format!("***{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_masked_to_two_visible_characters() {
        assert_eq!(mask_email("jane.doe@example.com"), "ja***@example.com");
        assert_eq!(mask_email("a@example.com"), "a***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[test]
    fn phone_keeps_last_four_digits() {
        assert_eq!(mask_phone("+919876543210"), "***3210");
        assert_eq!(mask_phone("+91 98765 43210"), "***3210");
        assert_eq!(mask_phone("1234"), "***");
        assert_eq!(mask_phone(""), "***");
    }

    #[test]
    fn entry_builder_masks_contact_fields() {
        let entry = AuditEntry::new(event::ORDER_CREATED, RequestMeta::default())
            .contact("jane@example.com", "+919876543210");
        assert_eq!(entry.customer_email.as_deref(), Some("ja***@example.com"));
        assert_eq!(entry.customer_phone.as_deref(), Some("***3210"));
    }
}
