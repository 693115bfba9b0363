//! Storage-level guard against double booking
//!
//! Two reservations of one property in a blocking status (confirmed,
//! checked_in) may never overlap. The triggers abort the offending
//! statement with `reservation overlaps`, which the repository maps back to
//! an availability error. SQLite only; other backends rely on the
//! serializable transaction around the availability check.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend};

/// Message raised by the triggers
pub const OVERLAP_GUARD_MESSAGE: &str = "reservation overlaps";

fn overlap_check() -> String {
    format!(
        "SELECT RAISE(ABORT, '{OVERLAP_GUARD_MESSAGE}')
    WHERE EXISTS (
        SELECT 1 FROM reservations r
        WHERE r.property_id = NEW.property_id
          AND r.id IS NOT NEW.id
          AND r.status IN ('confirmed', 'checked_in')
          AND r.check_in_date < NEW.check_out_date
          AND NEW.check_in_date < r.check_out_date
    );"
    )
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() != DatabaseBackend::Sqlite {
            return Ok(());
        }

        let db = manager.get_connection();
        let check = overlap_check();

        db.execute_unprepared(&format!(
            "CREATE TRIGGER IF NOT EXISTS trg_reservations_overlap_insert
             BEFORE INSERT ON reservations
             WHEN NEW.status IN ('confirmed', 'checked_in')
             BEGIN {check} END;"
        ))
        .await?;

        db.execute_unprepared(&format!(
            "CREATE TRIGGER IF NOT EXISTS trg_reservations_overlap_update
             BEFORE UPDATE OF status, check_in_date, check_out_date, property_id ON reservations
             WHEN NEW.status IN ('confirmed', 'checked_in')
             BEGIN {check} END;"
        ))
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() != DatabaseBackend::Sqlite {
            return Ok(());
        }

        let db = manager.get_connection();
        db.execute_unprepared("DROP TRIGGER IF EXISTS trg_reservations_overlap_insert")
            .await?;
        db.execute_unprepared("DROP TRIGGER IF EXISTS trg_reservations_overlap_update")
            .await?;
        Ok(())
    }
}
