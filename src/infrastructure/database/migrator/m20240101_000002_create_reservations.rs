//! Create reservations table
//!
//! Money is stored in minor units; stay dates are plain calendar dates.

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
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Reservations::BookingId)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Reservations::PropertyId).integer().not_null())
                    .col(ColumnDef::new(Reservations::GuestId).string().not_null())
                    .col(ColumnDef::new(Reservations::CheckInDate).date().not_null())
                    .col(ColumnDef::new(Reservations::CheckOutDate).date().not_null())
                    .col(ColumnDef::new(Reservations::Nights).integer().not_null())
                    .col(ColumnDef::new(Reservations::GuestCount).integer().not_null())
                    .col(ColumnDef::new(Reservations::SpecialRequests).text())
                    .col(
                        ColumnDef::new(Reservations::AccommodationCost)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservations::CleaningFee).big_integer().not_null())
                    .col(ColumnDef::new(Reservations::ServiceFee).big_integer().not_null())
                    .col(ColumnDef::new(Reservations::Taxes).big_integer().not_null())
                    .col(ColumnDef::new(Reservations::TotalAmount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Reservations::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Reservations::ConfirmationCode).string_len(6))
                    .col(ColumnDef::new(Reservations::CancelledAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Reservations::CancellationReason).string_len(20))
                    .col(ColumnDef::new(Reservations::CancellationNotes).text())
                    .col(ColumnDef::new(Reservations::RefundAmount).big_integer())
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_property")
                            .from(Reservations::Table, Reservations::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_property_check_in")
                    .table(Reservations::Table)
                    .col(Reservations::PropertyId)
                    .col(Reservations::CheckInDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_guest_status")
                    .table(Reservations::Table)
                    .col(Reservations::GuestId)
                    .col(Reservations::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    BookingId,
    PropertyId,
    GuestId,
    CheckInDate,
    CheckOutDate,
    Nights,
    GuestCount,
    SpecialRequests,
    AccommodationCost,
    CleaningFee,
    ServiceFee,
    Taxes,
    TotalAmount,
    Status,
    ConfirmationCode,
    CancelledAt,
    CancellationReason,
    CancellationNotes,
    RefundAmount,
    CreatedAt,
    UpdatedAt,
}
