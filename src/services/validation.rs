//! Pure field validators for the quick-payment form.
//!
//! Each returns `None` when the value is acceptable or a human-readable
//! reason when it is not. Callers may run all of them and collect the
//! reasons; none has side effects.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
    // General international format: optional +, leading non-zero digit,
    // at most 15 digits total.
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[1-9]\d{0,14}$").unwrap();
}

pub fn validate_name(name: &str) -> Option<String> {
    if name.trim().chars().count() < 2 {
        Some("Name must be at least 2 characters".to_string())
    } else {
        None
    }
}

pub fn validate_email(email: &str) -> Option<String> {
    let email = email.trim();
    if email.is_empty() {
        return Some("Email is required".to_string());
    }
    if !EMAIL_RE.is_match(email) {
        return Some("Email address is not valid".to_string());
    }
    None
}

pub fn validate_phone(phone: &str) -> Option<String> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Some("Phone number is required".to_string());
    }
    let normalized: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    if !PHONE_RE.is_match(&normalized) {
        return Some("Phone number is not valid".to_string());
    }
    None
}

pub fn validate_amount(amount: Decimal, min: Decimal, max: Decimal) -> Option<String> {
    if amount < min {
        Some(format!("Amount must be at least ₹{}", min))
    } else if amount > max {
        Some(format!("Amount must not exceed ₹{}", max))
    } else {
        None
    }
}
