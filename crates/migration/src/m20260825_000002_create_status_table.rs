use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Static severity reference data. Severity values are unique so their
/// ordering is total.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Status::Table)
                    .if_not_exists()
                    .col(pk_auto(Status::Id))
                    .col(string(Status::Slug).unique_key().to_owned())
                    .col(string(Status::Name))
                    .col(integer(Status::Severity).unique_key().to_owned())
                    .col(string(Status::Image).default("").to_owned())
                    .col(boolean(Status::IsInfo).default(false).to_owned())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Status::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Status {
    Table,
    Id,
    Slug,
    Name,
    Severity,
    Image,
    IsInfo,
}
