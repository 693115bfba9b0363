//! Unified access to the per-aggregate repositories

use super::blocked_date::BlockedDateRepository;
use super::property::PropertyRepository;
use super::reservation::ReservationRepository;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let property = repos.properties().find_by_id(7).await?;
///     let blocked = repos.blocked_dates().list_for_property(7).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn properties(&self) -> &dyn PropertyRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn blocked_dates(&self) -> &dyn BlockedDateRepository;
}
