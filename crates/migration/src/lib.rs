//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_user;
mod m20240301_000002_create_user_credentials;
mod m20240301_000003_create_catalog;
mod m20240301_000004_create_booking;
mod m20240301_000005_create_messages;
mod m20240301_000006_create_site_content;
mod m20240301_000007_create_fees;
mod m20240301_000008_create_class_session;
mod m20240301_000009_create_notification;
mod m20240301_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_user::Migration),
            Box::new(m20240301_000002_create_user_credentials::Migration),
            Box::new(m20240301_000003_create_catalog::Migration),
            Box::new(m20240301_000004_create_booking::Migration),
            Box::new(m20240301_000005_create_messages::Migration),
            Box::new(m20240301_000006_create_site_content::Migration),
            Box::new(m20240301_000007_create_fees::Migration),
            Box::new(m20240301_000008_create_class_session::Migration),
            Box::new(m20240301_000009_create_notification::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000010_add_indexes::Migration),
        ]
    }
}
