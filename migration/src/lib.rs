pub use sea_orm_migration::prelude::*;

mod m20250110_000001_create_profiles_and_places;
mod m20250110_000002_create_credit_transactions;
mod m20250115_000001_create_subscriptions;
mod m20250120_000001_create_tours;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250110_000001_create_profiles_and_places::Migration),
            Box::new(m20250110_000002_create_credit_transactions::Migration),
            Box::new(m20250115_000001_create_subscriptions::Migration),
            Box::new(m20250120_000001_create_tours::Migration),
        ]
    }
}
