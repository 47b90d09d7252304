//! Create `document` table.
//!
//! Holds every record kind as a JSON body keyed by `(kind, key)`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Document::Table)
                    .if_not_exists()
                    .col(string_len(Document::Kind, 64).not_null())
                    .col(string_len(Document::Key, 256).not_null())
                    .col(json_binary(Document::Body).not_null())
                    .col(json_binary(Document::Labels).not_null())
                    .col(timestamp_with_time_zone(Document::CreateTime).not_null())
                    .col(timestamp_with_time_zone(Document::UpdateTime).not_null())
                    .primary_key(Index::create().col(Document::Kind).col(Document::Key))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Document::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Document { Table, Kind, Key, Body, Labels, CreateTime, UpdateTime }
