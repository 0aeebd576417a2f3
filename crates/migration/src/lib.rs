pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_releases_table;
mod m20240101_000003_create_deployment_logs_table;
mod m20240101_000004_add_deployment_log_indexes;

pub(crate) use m20240101_000001_create_users_table::Users;
pub(crate) use m20240101_000002_create_releases_table::Releases;
pub(crate) use m20240101_000003_create_deployment_logs_table::DeploymentLogs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_releases_table::Migration),
            Box::new(m20240101_000003_create_deployment_logs_table::Migration),
            Box::new(m20240101_000004_add_deployment_log_indexes::Migration),
        ]
    }
}
