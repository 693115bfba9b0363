//! Create properties table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Properties::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Properties::HostId).string().not_null())
                    .col(ColumnDef::new(Properties::Title).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Properties::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Properties::City).string().not_null())
                    .col(
                        ColumnDef::new(Properties::State)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Properties::Country).string().not_null())
                    .col(
                        ColumnDef::new(Properties::PropertyType)
                            .string_len(20)
                            .not_null()
                            .default("entire_place"),
                    )
                    .col(ColumnDef::new(Properties::NightlyRate).big_integer().not_null())
                    .col(
                        ColumnDef::new(Properties::CleaningFee)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Properties::SecurityDeposit)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Properties::MinNights)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Properties::MaxNights)
                            .integer()
                            .not_null()
                            .default(365),
                    )
                    .col(ColumnDef::new(Properties::MaxGuests).integer().not_null())
                    .col(
                        ColumnDef::new(Properties::AdvanceBookingDays)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Properties::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Properties::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Properties::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Properties::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_properties_city")
                    .table(Properties::Table)
                    .col(Properties::City)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_properties_host")
                    .table(Properties::Table)
                    .col(Properties::HostId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Properties {
    Table,
    Id,
    HostId,
    Title,
    Description,
    City,
    State,
    Country,
    PropertyType,
    NightlyRate,
    CleaningFee,
    SecurityDeposit,
    MinNights,
    MaxNights,
    MaxGuests,
    AdvanceBookingDays,
    Status,
    IsAvailable,
    CreatedAt,
    UpdatedAt,
}
