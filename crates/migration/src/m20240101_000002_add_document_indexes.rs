//! Listing indexes: per-kind ordering by creation time and label lookups.
use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_document::Document;

#[derive(DeriveMigrationName)]
pub struct Migration;

const KIND_CREATE_TIME_IDX: &str = "idx_document_kind_create_time";
const LABELS_IDX: &str = "idx_document_labels";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name(KIND_CREATE_TIME_IDX)
                    .table(Document::Table)
                    .col(Document::Kind)
                    .col(Document::CreateTime)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .get_connection()
            .execute_unprepared(&format!(
                "CREATE INDEX IF NOT EXISTS {LABELS_IDX} ON document USING GIN (labels)"
            ))
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&format!("DROP INDEX IF EXISTS {LABELS_IDX}"))
            .await?;
        manager
            .drop_index(Index::drop().name(KIND_CREATE_TIME_IDX).table(Document::Table).to_owned())
            .await
    }
}
