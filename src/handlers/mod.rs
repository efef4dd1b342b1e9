pub mod booking;
pub mod payment;
