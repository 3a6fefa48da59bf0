//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20220101_000011_create_customer;
mod m20220101_000012_create_manager;
mod m20220101_000013_create_credentials;
mod m20220101_000014_create_product_service;
mod m20220101_000015_create_service_option;
mod m20220101_000016_create_booking;
mod m20220101_000017_create_booking_progress;
mod m20220101_000018_create_booking_history;
mod m20220101_000002_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20220101_000011_create_customer::Migration),
            Box::new(m20220101_000012_create_manager::Migration),
            Box::new(m20220101_000013_create_credentials::Migration),
            Box::new(m20220101_000014_create_product_service::Migration),
            Box::new(m20220101_000015_create_service_option::Migration),
            Box::new(m20220101_000016_create_booking::Migration),
            Box::new(m20220101_000017_create_booking_progress::Migration),
            Box::new(m20220101_000018_create_booking_history::Migration),
            // Indexes should always be applied last
            Box::new(m20220101_000002_add_indexes::Migration),
        ]
    }
}
