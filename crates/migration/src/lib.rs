pub use sea_orm_migration::prelude::*;

mod m20260825_000001_create_service_table;
mod m20260825_000002_create_status_table;
mod m20260825_000003_create_event_table;
mod m20260825_000004_create_profile_table;
mod m20260825_000005_create_auth_request_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260825_000001_create_service_table::Migration),
            Box::new(m20260825_000002_create_status_table::Migration),
            Box::new(m20260825_000003_create_event_table::Migration),
            Box::new(m20260825_000004_create_profile_table::Migration),
            Box::new(m20260825_000005_create_auth_request_table::Migration),
        ]
    }
}
