use std::env;

use rust_decimal::Decimal;

/// Runtime environment, derived from `APP_ENV`.
///
/// Drives the booking-reference prefix (`TEST` vs `LIVE`) and whether the
/// stricter production amount floor applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn reference_prefix(&self) -> &'static str {
        match self {
            Environment::Development => "TEST",
            Environment::Production => "LIVE",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    pub min_payment_amount: Decimal,
    pub max_payment_amount: Decimal,
    pub currency: String,
    pub environment: Environment,
    pub port: u16,
}

/// Stricter floor applied outside development, on top of `MIN_PAYMENT_AMOUNT`.
pub const PRODUCTION_MIN_AMOUNT: u32 = 100;

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;
        let razorpay_key_id =
            env::var("RAZORPAY_KEY_ID").map_err(|_| "RAZORPAY_KEY_ID must be set".to_string())?;
        let razorpay_key_secret = env::var("RAZORPAY_KEY_SECRET")
            .map_err(|_| "RAZORPAY_KEY_SECRET must be set".to_string())?;

        let min_payment_amount = parse_decimal_var("MIN_PAYMENT_AMOUNT", "500")?;
        let max_payment_amount = parse_decimal_var("MAX_PAYMENT_AMOUNT", "500000")?;

        let currency = env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "INR".to_string());

        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        };

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| "PORT must be a valid port number".to_string())?;

        Ok(Self {
            database_url,
            razorpay_key_id,
            razorpay_key_secret,
            min_payment_amount,
            max_payment_amount,
            currency,
            environment,
            port,
        })
    }
}

fn parse_decimal_var(name: &str, default: &str) -> Result<Decimal, String> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<Decimal>()
        .map_err(|_| format!("{} must be a decimal number, got '{}'", name, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_prefix_follows_environment() {
        assert_eq!(Environment::Development.reference_prefix(), "TEST");
        assert_eq!(Environment::Production.reference_prefix(), "LIVE");
    }
}
