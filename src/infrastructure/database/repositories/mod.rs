//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod blocked_date_repository;
pub mod property_repository;
pub mod repository_provider;
pub mod reservation_repository;

pub use blocked_date_repository::SeaOrmBlockedDateRepository;
pub use property_repository::SeaOrmPropertyRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use reservation_repository::SeaOrmReservationRepository;

use rust_decimal::Decimal;

use crate::domain::availability::to_minor_units;
use crate::domain::{DomainError, DomainResult};

// ── Conversion helpers shared by the repositories ───────────────

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

/// A stored value the domain cannot represent
fn corrupt(entity: &str, field: &str, value: impl std::fmt::Display) -> DomainError {
    DomainError::Storage(format!("{entity}.{field} holds invalid value '{value}'"))
}

fn cents(amount: Decimal, field: &str) -> DomainResult<i64> {
    to_minor_units(amount)
        .ok_or_else(|| DomainError::Validation(format!("{field} is out of range: {amount}")))
}

fn count(value: i32, entity: &str, field: &str) -> DomainResult<u32> {
    u32::try_from(value).map_err(|_| corrupt(entity, field, value))
}

fn column_int(value: u32, field: &str) -> DomainResult<i32> {
    i32::try_from(value).map_err(|_| DomainError::Validation(format!("{field} is too large: {value}")))
}
