//! Reservation repository interface

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use super::model::{NewReservation, Reservation, ReservationStatus, Transition};
use crate::domain::availability::{PricingPolicy, StayRequest};
use crate::domain::property::Property;
use crate::domain::DomainResult;

/// Listing filters; `None` means "any".
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub property_id: Option<i32>,
    pub guest_id: Option<String>,
    pub status: Option<ReservationStatus>,
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Evaluate `stay` against the property's blocking reservations and
    /// blocked dates, then insert a pending reservation. The read and the
    /// write happen in one transaction.
    async fn insert_if_available(
        &self,
        property: &Property,
        stay: &StayRequest,
        new: NewReservation,
        policy: &PricingPolicy,
        now: DateTime<Utc>,
    ) -> DomainResult<Reservation>;

    /// Apply a lifecycle step and persist the result. Entering a blocking
    /// status re-checks the calendar inside the same transaction.
    async fn apply_transition(
        &self,
        id: i32,
        transition: Transition,
        now: DateTime<Utc>,
    ) -> DomainResult<Reservation>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    /// Find reservation by its public `BK…` reference
    async fn find_by_booking_id(&self, booking_id: &str) -> DomainResult<Option<Reservation>>;

    /// List reservations matching `filter`, ordered by check-in
    async fn find_filtered(&self, filter: &ReservationFilter) -> DomainResult<Vec<Reservation>>;

    /// Confirmed or checked-in reservations of a property overlapping
    /// `[check_in, check_out)`
    async fn find_blocking(
        &self,
        property_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> DomainResult<Vec<Reservation>>;

    /// Checked-out reservations whose check-out date is on or before `today`
    async fn find_due_for_completion(&self, today: NaiveDate) -> DomainResult<Vec<Reservation>>;
}
