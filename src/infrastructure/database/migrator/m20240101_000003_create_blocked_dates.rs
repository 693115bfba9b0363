//! Create blocked_dates table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_properties::Properties;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlockedDates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlockedDates::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlockedDates::PropertyId).integer().not_null())
                    .col(ColumnDef::new(BlockedDates::Date).date().not_null())
                    .col(
                        ColumnDef::new(BlockedDates::Reason)
                            .string_len(20)
                            .not_null()
                            .default("host_blocked"),
                    )
                    .col(
                        ColumnDef::new(BlockedDates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blocked_dates_property")
                            .from(BlockedDates::Table, BlockedDates::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blocked_dates_property_date")
                    .table(BlockedDates::Table)
                    .col(BlockedDates::PropertyId)
                    .col(BlockedDates::Date)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlockedDates::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum BlockedDates {
    Table,
    Id,
    PropertyId,
    Date,
    Reason,
    CreatedAt,
}
