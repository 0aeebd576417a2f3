use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeploymentLogs::Table)
                    .col(
                        ColumnDef::new(DeploymentLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeploymentLogs::ReleaseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeploymentLogs::Environment)
                            .string_len(8)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeploymentLogs::DeployedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeploymentLogs::DeploymentTimestamp)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(ColumnDef::new(DeploymentLogs::Success).boolean().not_null())
                    .col(ColumnDef::new(DeploymentLogs::Notes).text())
                    .foreign_key(
                        ForeignKey::create()
                            .from(DeploymentLogs::Table, DeploymentLogs::ReleaseId)
                            .to(crate::Releases::Table, crate::Releases::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DeploymentLogs::Table, DeploymentLogs::DeployedBy)
                            .to(crate::Users::Table, crate::Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeploymentLogs::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
pub(crate) enum DeploymentLogs {
    Table,
    Id,
    ReleaseId,
    Environment,
    DeployedBy,
    DeploymentTimestamp,
    Success,
    Notes,
}
