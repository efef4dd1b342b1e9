pub use sea_orm_migration::prelude::*;

mod m20260810_000001_create_destinations;
mod m20260810_000002_create_bookings;
mod m20260810_000003_create_payments;
mod m20260810_000004_create_audit_logs;
mod m20260811_000001_seed_destinations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260810_000001_create_destinations::Migration),
            Box::new(m20260810_000002_create_bookings::Migration),
            Box::new(m20260810_000003_create_payments::Migration),
            Box::new(m20260810_000004_create_audit_logs::Migration),
            Box::new(m20260811_000001_seed_destinations::Migration),
        ]
    }
}
