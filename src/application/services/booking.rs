//! Booking service: quotes, booking creation and the reservation lifecycle
//!
//! Every write that can occupy a property's calendar takes that property's
//! in-process lock first, then hands the read-check-write sequence to the
//! repository, which runs it in one database transaction.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::availability::{
    check_and_price, compute_refund, validate_stay, CostBreakdown, PricingPolicy, StayRequest,
};
use crate::domain::property::Property;
use crate::domain::reservation::{
    CancellationReason, NewReservation, Reservation, ReservationFilter, Transition,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Booking request as submitted by a guest
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub property_id: i32,
    pub guest_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_count: u32,
    pub special_requests: Option<String>,
}

impl CreateBooking {
    pub fn stay(&self) -> StayRequest {
        StayRequest::new(self.check_in, self.check_out, self.guest_count)
    }
}

/// Priced, currently available stay
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub property_id: i32,
    pub stay: StayRequest,
    pub nights: u32,
    pub cost: CostBreakdown,
}

/// Booking behaviour switches
#[derive(Debug, Clone, Copy)]
pub struct BookingOptions {
    pub policy: PricingPolicy,
    /// Enforce each property's `advance_booking_days`
    pub enforce_advance_notice: bool,
}

impl Default for BookingOptions {
    fn default() -> Self {
        Self {
            policy: PricingPolicy::STANDARD,
            enforce_advance_notice: true,
        }
    }
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    options: BookingOptions,
    /// One writer per property within this process
    property_locks: DashMap<i32, Arc<Mutex<()>>>,
}

impl BookingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, options: BookingOptions) -> Self {
        Self {
            repos,
            options,
            property_locks: DashMap::new(),
        }
    }

    pub fn repos(&self) -> &Arc<dyn RepositoryProvider> {
        &self.repos
    }

    fn property_lock(&self, property_id: i32) -> Arc<Mutex<()>> {
        self.property_locks
            .entry(property_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn load_bookable(&self, property_id: i32) -> DomainResult<Property> {
        let property = self
            .repos
            .properties()
            .find_by_id(property_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Property", "id", property_id))?;

        if !property.is_bookable() {
            return Err(DomainError::Conflict(format!(
                "Property {} is not accepting bookings (status {}, available {})",
                property.id, property.status, property.is_available
            )));
        }
        Ok(property)
    }

    /// Range, length and capacity, then the advance-notice floor.
    fn precheck(&self, property: &Property, stay: &StayRequest, today: NaiveDate) -> DomainResult<u32> {
        let nights = validate_stay(property, stay)?;

        if self.options.enforce_advance_notice {
            let actual_days = (stay.check_in - today).num_days();
            if actual_days < i64::from(property.advance_booking_days) {
                return Err(DomainError::AdvanceNoticeViolation {
                    required_days: property.advance_booking_days,
                    actual_days,
                });
            }
        }
        Ok(nights)
    }

    /// Price a stay without persisting anything.
    pub async fn quote(&self, property_id: i32, stay: StayRequest, today: NaiveDate) -> DomainResult<Quote> {
        let property = self.load_bookable(property_id).await?;
        let nights = self.precheck(&property, &stay, today)?;

        let existing = self
            .repos
            .reservations()
            .find_blocking(property.id, stay.check_in, stay.check_out)
            .await?;
        let cost = check_and_price(&property, &stay, &existing, &self.options.policy)?;

        let blocked = self
            .repos
            .blocked_dates()
            .find_in_range(property.id, stay.check_in, stay.check_out)
            .await?;
        if !blocked.is_empty() {
            return Err(DomainError::DatesBlocked {
                dates: blocked.into_iter().map(|b| b.date).collect(),
            });
        }

        Ok(Quote {
            property_id,
            stay,
            nights,
            cost,
        })
    }

    /// Create a pending reservation if the stay is bookable right now.
    pub async fn create_booking(&self, request: CreateBooking, now: DateTime<Utc>) -> DomainResult<Reservation> {
        let result = self.try_create_booking(request, now).await;
        match &result {
            Ok(r) => {
                metrics::counter!("bookings_created_total").increment(1);
                info!(
                    reservation_id = r.id,
                    booking_id = %r.booking_id,
                    property_id = r.property_id,
                    check_in = %r.check_in,
                    check_out = %r.check_out,
                    total = %r.cost.total,
                    "Booking created"
                );
            }
            Err(e) => {
                metrics::counter!("booking_rejections_total", "reason" => e.kind()).increment(1);
                if e.is_transient() {
                    warn!(error = %e, "Booking failed");
                } else {
                    info!(reason = e.kind(), error = %e, "Booking rejected");
                }
            }
        }
        result
    }

    async fn try_create_booking(&self, request: CreateBooking, now: DateTime<Utc>) -> DomainResult<Reservation> {
        if request.guest_id.trim().is_empty() {
            return Err(DomainError::Validation("guest_id must not be empty".into()));
        }

        let stay = request.stay();
        let lock = self.property_lock(request.property_id);
        let _guard = lock.lock().await;

        let property = self.load_bookable(request.property_id).await?;
        self.precheck(&property, &stay, now.date_naive())?;

        let new = NewReservation {
            property_id: property.id,
            guest_id: request.guest_id,
            check_in: request.check_in,
            check_out: request.check_out,
            guest_count: request.guest_count,
            special_requests: request.special_requests,
        };
        self.repos
            .reservations()
            .insert_if_available(&property, &stay, new, &self.options.policy, now)
            .await
    }

    pub async fn get(&self, id: i32) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", "id", id))
    }

    pub async fn list(&self, filter: &ReservationFilter) -> DomainResult<Vec<Reservation>> {
        self.repos.reservations().find_filtered(filter).await
    }

    async fn transition(&self, id: i32, transition: Transition, now: DateTime<Utc>) -> DomainResult<Reservation> {
        let property_id = self.get(id).await?.property_id;
        let action = transition.action();

        let lock = self.property_lock(property_id);
        let _guard = lock.lock().await;

        match self.repos.reservations().apply_transition(id, transition, now).await {
            Ok(r) => {
                metrics::counter!("reservation_transitions_total", "to" => r.status.as_str())
                    .increment(1);
                info!(
                    reservation_id = r.id,
                    booking_id = %r.booking_id,
                    status = %r.status,
                    "Reservation updated"
                );
                Ok(r)
            }
            Err(e) => {
                info!(reservation_id = id, action, error = %e, "Transition rejected");
                Err(e)
            }
        }
    }

    pub async fn confirm(&self, id: i32, now: DateTime<Utc>) -> DomainResult<Reservation> {
        self.transition(id, Transition::Confirm, now).await
    }

    pub async fn check_in(&self, id: i32, now: DateTime<Utc>) -> DomainResult<Reservation> {
        self.transition(id, Transition::CheckIn, now).await
    }

    pub async fn check_out(&self, id: i32, now: DateTime<Utc>) -> DomainResult<Reservation> {
        self.transition(id, Transition::CheckOut, now).await
    }

    pub async fn complete(&self, id: i32, now: DateTime<Utc>) -> DomainResult<Reservation> {
        self.transition(id, Transition::Complete, now).await
    }

    /// Cancel and persist the refund due at `now`.
    pub async fn cancel(
        &self,
        id: i32,
        reason: CancellationReason,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Reservation> {
        self.transition(id, Transition::Cancel { reason, notes }, now).await
    }

    /// Refund a cancellation at `now` would yield.
    pub async fn refund_preview(&self, id: i32, now: DateTime<Utc>) -> DomainResult<Decimal> {
        let reservation = self.get(id).await?;
        Ok(compute_refund(&reservation, now))
    }

    /// Complete every checked-out stay whose check-out date has passed.
    /// Returns how many were completed.
    pub async fn complete_finished_stays(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let due = self
            .repos
            .reservations()
            .find_due_for_completion(now.date_naive())
            .await?;

        let mut completed = 0;
        for r in due {
            match self.complete(r.id, now).await {
                Ok(_) => completed += 1,
                Err(e) => warn!(reservation_id = r.id, error = %e, "Failed to complete stay"),
            }
        }
        Ok(completed)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::availability::testing::{date, dec, property};
    use crate::domain::blocked_date::{BlockReason, BlockedDate};
    use crate::domain::property::PropertyStatus;
    use crate::domain::reservation::ReservationStatus;
    use crate::domain::AvailabilityError;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::test_database;
    use chrono::TimeZone;

    fn morning(day: &str) -> DateTime<Utc> {
        Utc.from_utc_datetime(&date(day).and_hms_opt(9, 0, 0).unwrap())
    }

    async fn service_with(p: Property) -> (Arc<BookingService>, Property) {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_database().await));
        let saved = repos.properties().save(p).await.unwrap();
        let service = Arc::new(BookingService::new(repos, BookingOptions::default()));
        (service, saved)
    }

    async fn service() -> (Arc<BookingService>, Property) {
        service_with(property()).await
    }

    fn request(property_id: i32, check_in: &str, check_out: &str, guests: u32) -> CreateBooking {
        CreateBooking {
            property_id,
            guest_id: "guest-1".into(),
            check_in: date(check_in),
            check_out: date(check_out),
            guest_count: guests,
            special_requests: Some("late arrival".into()),
        }
    }

    #[tokio::test]
    async fn quote_prices_without_persisting() {
        let (svc, p) = service().await;
        let q = svc
            .quote(p.id, StayRequest::new(date("2024-06-01"), date("2024-06-04"), 2), date("2024-05-01"))
            .await
            .unwrap();
        assert_eq!(q.nights, 3);
        assert_eq!(q.cost.total, dec("376.40"));
        assert!(svc.list(&ReservationFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn booking_then_confirm_then_overlap_is_rejected() {
        let (svc, p) = service().await;
        let now = morning("2024-05-01");

        let r = svc.create_booking(request(p.id, "2024-06-01", "2024-06-05", 2), now).await.unwrap();
        assert_eq!(r.status, ReservationStatus::Pending);
        assert_eq!(r.special_requests.as_deref(), Some("late arrival"));

        let r = svc.confirm(r.id, now).await.unwrap();
        assert_eq!(r.status, ReservationStatus::Confirmed);
        assert!(r.confirmation_code.is_some());

        let err = svc
            .create_booking(request(p.id, "2024-06-03", "2024-06-06", 1), now)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "unavailable");

        let err = svc
            .quote(p.id, StayRequest::new(date("2024-06-04"), date("2024-06-06"), 1), now.date_naive())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "unavailable");
    }

    #[tokio::test]
    async fn advance_notice_is_enforced() {
        let mut p = property();
        p.advance_booking_days = 3;
        let (svc, p) = service_with(p).await;

        let err = svc
            .create_booking(request(p.id, "2024-06-03", "2024-06-05", 1), morning("2024-06-01"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::AdvanceNoticeViolation {
                required_days: 3,
                actual_days: 2
            }
        ));

        svc.create_booking(request(p.id, "2024-06-04", "2024-06-06", 1), morning("2024-06-01"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn evaluator_errors_come_before_advance_notice() {
        let (svc, p) = service().await;
        // Past check-in and too many guests: capacity is reported.
        let err = svc
            .create_booking(request(p.id, "2024-06-01", "2024-06-03", 9), morning("2024-06-05"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Availability(AvailabilityError::CapacityViolation { .. })
        ));
    }

    #[tokio::test]
    async fn unbookable_property_is_refused() {
        let mut p = property();
        p.status = PropertyStatus::Inactive;
        let (svc, p) = service_with(p).await;

        let err = svc
            .create_booking(request(p.id, "2024-06-01", "2024-06-03", 1), morning("2024-05-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let err = svc
            .create_booking(request(p.id + 100, "2024-06-01", "2024-06-03", 1), morning("2024-05-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn blocked_dates_fail_quote_and_booking() {
        let (svc, p) = service().await;
        svc.repos()
            .blocked_dates()
            .add(BlockedDate::new(p.id, date("2024-06-02"), BlockReason::PersonalUse))
            .await
            .unwrap();

        let err = svc
            .quote(p.id, StayRequest::new(date("2024-06-01"), date("2024-06-03"), 1), date("2024-05-01"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "dates_blocked");

        let err = svc
            .create_booking(request(p.id, "2024-06-01", "2024-06-03", 1), morning("2024-05-01"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "dates_blocked");
    }

    #[tokio::test]
    async fn cancel_persists_refund_and_preview_matches() {
        let (svc, p) = service().await;
        let r = svc
            .create_booking(request(p.id, "2024-06-10", "2024-06-13", 2), morning("2024-05-01"))
            .await
            .unwrap();
        svc.confirm(r.id, morning("2024-05-01")).await.unwrap();

        let when = morning("2024-06-05");
        let preview = svc.refund_preview(r.id, when).await.unwrap();
        assert_eq!(preview, dec("188.20"));

        let cancelled = svc
            .cancel(r.id, CancellationReason::GuestRequest, Some("flight".into()), when)
            .await
            .unwrap();
        assert_eq!(cancelled.cancellation.unwrap().refund_amount, preview);

        // Nothing more is refundable once cancelled.
        assert_eq!(svc.refund_preview(r.id, when).await.unwrap(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn invalid_transitions_are_rejected() {
        let (svc, p) = service().await;
        let now = morning("2024-05-01");
        let r = svc.create_booking(request(p.id, "2024-06-01", "2024-06-03", 1), now).await.unwrap();

        let err = svc.check_in(r.id, now).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidTransition {
                from: ReservationStatus::Pending,
                ..
            }
        ));
        assert_eq!(svc.get(r.id).await.unwrap().status, ReservationStatus::Pending);
    }

    #[tokio::test]
    async fn finished_stays_are_completed() {
        let (svc, p) = service().await;
        let now = morning("2024-05-01");
        let r = svc.create_booking(request(p.id, "2024-06-01", "2024-06-03", 1), now).await.unwrap();
        svc.confirm(r.id, now).await.unwrap();
        svc.check_in(r.id, morning("2024-06-01")).await.unwrap();
        svc.check_out(r.id, morning("2024-06-03")).await.unwrap();

        assert_eq!(svc.complete_finished_stays(morning("2024-06-02")).await.unwrap(), 0);
        assert_eq!(svc.complete_finished_stays(morning("2024-06-03")).await.unwrap(), 1);
        assert_eq!(svc.get(r.id).await.unwrap().status, ReservationStatus::Completed);
    }

    #[tokio::test]
    async fn concurrent_confirmations_leave_one_winner() {
        let (svc, p) = service().await;
        let now = morning("2024-05-01");

        let mut ids = Vec::new();
        for _ in 0..8 {
            let r = svc
                .create_booking(request(p.id, "2024-06-01", "2024-06-05", 1), now)
                .await
                .unwrap();
            ids.push(r.id);
        }

        let handles: Vec<_> = ids
            .into_iter()
            .map(|id| {
                let svc = Arc::clone(&svc);
                tokio::spawn(async move { svc.confirm(id, now).await })
            })
            .collect();

        let mut confirmed = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => confirmed += 1,
                Err(e) => assert_eq!(e.kind(), "unavailable"),
            }
        }
        assert_eq!(confirmed, 1);

        let blocking = svc
            .repos()
            .reservations()
            .find_blocking(p.id, date("2024-06-01"), date("2024-06-05"))
            .await
            .unwrap();
        assert_eq!(blocking.len(), 1);
    }
}
