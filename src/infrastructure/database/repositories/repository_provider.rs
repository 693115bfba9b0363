//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::blocked_date::BlockedDateRepository;
use crate::domain::property::PropertyRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::ReservationRepository;

use super::blocked_date_repository::SeaOrmBlockedDateRepository;
use super::property_repository::SeaOrmPropertyRepository;
use super::reservation_repository::SeaOrmReservationRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let property = repos.properties().find_by_id(7).await?;
/// let stays = repos.reservations().find_due_for_completion(today).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    properties: SeaOrmPropertyRepository,
    reservations: SeaOrmReservationRepository,
    blocked_dates: SeaOrmBlockedDateRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            properties: SeaOrmPropertyRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            blocked_dates: SeaOrmBlockedDateRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn properties(&self) -> &dyn PropertyRepository {
        &self.properties
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn blocked_dates(&self) -> &dyn BlockedDateRepository {
        &self.blocked_dates
    }
}
