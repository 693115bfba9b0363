//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_properties;
mod m20240101_000002_create_reservations;
mod m20240101_000003_create_blocked_dates;
mod m20240101_000004_add_reservation_overlap_guard;

pub use m20240101_000004_add_reservation_overlap_guard::OVERLAP_GUARD_MESSAGE;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_properties::Migration),
            Box::new(m20240101_000002_create_reservations::Migration),
            Box::new(m20240101_000003_create_blocked_dates::Migration),
            Box::new(m20240101_000004_add_reservation_overlap_guard::Migration),
        ]
    }
}
