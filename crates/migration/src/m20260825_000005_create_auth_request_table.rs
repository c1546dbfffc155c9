use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Transient handshake state, upserted by owner when a link attempt starts.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuthRequest::Table)
                    .if_not_exists()
                    .col(pk_auto(AuthRequest::Id))
                    .col(string(AuthRequest::Owner).unique_key().to_owned())
                    .col(string(AuthRequest::RequestSecret))
                    .col(
                        timestamp_with_time_zone(AuthRequest::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .to_owned(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuthRequest::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum AuthRequest {
    Table,
    Id,
    Owner,
    RequestSecret,
    UpdatedAt,
}
