use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_table;
mod m20250301_000002_create_listings_table;
mod m20250301_000003_create_validation_tokens_table;
mod m20250301_000004_create_favorites_table;
mod m20250301_000005_create_notifications_table;
mod m20250301_000006_create_messages_table;
mod m20250301_000007_add_performance_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_table::Migration),
            Box::new(m20250301_000002_create_listings_table::Migration),
            Box::new(m20250301_000003_create_validation_tokens_table::Migration),
            Box::new(m20250301_000004_create_favorites_table::Migration),
            Box::new(m20250301_000005_create_notifications_table::Migration),
            Box::new(m20250301_000006_create_messages_table::Migration),
            Box::new(m20250301_000007_add_performance_indexes::Migration),
        ]
    }
}
