use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260825_000001_create_service_table::Service;
use crate::m20260825_000002_create_status_table::Status;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .if_not_exists()
                    .col(pk_auto(Event::Id))
                    .col(integer(Event::ServiceId))
                    .col(integer(Event::StatusId))
                    .col(timestamp_with_time_zone(Event::Start))
                    .col(
                        ColumnDef::new(Event::End)
                            .timestamp_with_time_zone()
                            .null()
                            .to_owned(),
                    )
                    .col(string(Event::Message).default("").to_owned())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_service")
                            .from(Event::Table, Event::ServiceId)
                            .to(Service::Table, Service::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_status")
                            .from(Event::Table, Event::StatusId)
                            .to(Status::Table, Status::Id),
                    )
                    .index(
                        Index::create()
                            .name("idx_event_service_start")
                            .col(Event::ServiceId)
                            .col(Event::Start),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Event {
    Table,
    Id,
    ServiceId,
    StatusId,
    Start,
    End,
    Message,
}
