pub use super::audit_logs::Entity as AuditLogs;
pub use super::bookings::Entity as Bookings;
pub use super::destinations::Entity as Destinations;
pub use super::payments::Entity as Payments;
