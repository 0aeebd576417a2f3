use sea_orm_migration::prelude::*;

use crate::DeploymentLogs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("deployment_timestamp_deployment_logs_idx")
                    .table(DeploymentLogs::Table)
                    .col(DeploymentLogs::DeploymentTimestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("release_id_environment_deployment_logs_idx")
                    .table(DeploymentLogs::Table)
                    .col(DeploymentLogs::ReleaseId)
                    .col(DeploymentLogs::Environment)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("release_id_environment_deployment_logs_idx")
                    .table(DeploymentLogs::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("deployment_timestamp_deployment_logs_idx")
                    .table(DeploymentLogs::Table)
                    .to_owned(),
            )
            .await
    }
}
