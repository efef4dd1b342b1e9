// src/lib.rs

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use config::AppConfig;
use services::razorpay::PaymentGateway;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: AppConfig,
    pub gateway: Arc<dyn PaymentGateway>,
}

pub mod entities {
    pub mod prelude;
    pub mod audit_logs;
    pub mod bookings;
    pub mod destinations;
    pub mod payments;
}

pub mod services {
    pub mod audit;
    pub mod booking_lookup;
    pub mod order;
    pub mod razorpay;
    pub mod validation;
    pub mod verification;
}

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
