//! SeaORM implementation of ReservationRepository
//!
//! Writes that can create or move a calendar occupation run inside one
//! transaction together with the availability read. On SQLite the
//! overlap-guard triggers back this up at the storage level.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, IsolationLevel, NotSet, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use tracing::{debug, warn};

use super::blocked_date_repository::blocked_in_range;
use super::{cents, column_int, count, corrupt, db_err};
use crate::domain::availability::{
    check_and_price, from_minor_units, AvailabilityError, CostBreakdown, PricingPolicy,
    StayRequest,
};
use crate::domain::property::Property;
use crate::domain::reservation::{
    generate_booking_id, Cancellation, CancellationReason, NewReservation, Reservation,
    ReservationFilter, ReservationRepository, ReservationStatus, Transition,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::reservation;
use crate::infrastructure::database::migrator::OVERLAP_GUARD_MESSAGE;

/// Attempts at drawing an unused booking reference
const BOOKING_ID_ATTEMPTS: usize = 5;

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Serializable where the backend supports choosing; SQLite
    /// transactions are serializable already.
    async fn begin(&self) -> DomainResult<DatabaseTransaction> {
        let isolation = match self.db.get_database_backend() {
            DatabaseBackend::Sqlite => None,
            _ => Some(IsolationLevel::Serializable),
        };
        self.db
            .begin_with_config(isolation, None)
            .await
            .map_err(db_err)
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    let status =
        ReservationStatus::parse(&m.status).ok_or_else(|| corrupt("reservation", "status", &m.status))?;

    let cancellation = match (m.cancelled_at, m.cancellation_reason.as_deref()) {
        (Some(cancelled_at), Some(reason)) => Some(Cancellation {
            cancelled_at,
            reason: CancellationReason::parse(reason)
                .ok_or_else(|| corrupt("reservation", "cancellation_reason", reason))?,
            notes: m.cancellation_notes.clone(),
            refund_amount: m.refund_amount.map(from_minor_units).unwrap_or(Decimal::ZERO),
        }),
        _ => None,
    };

    Ok(Reservation {
        id: m.id,
        booking_id: m.booking_id,
        property_id: m.property_id,
        guest_id: m.guest_id,
        check_in: m.check_in_date,
        check_out: m.check_out_date,
        nights: count(m.nights, "reservation", "nights")?,
        guest_count: count(m.guest_count, "reservation", "guest_count")?,
        special_requests: m.special_requests,
        cost: CostBreakdown {
            accommodation_cost: from_minor_units(m.accommodation_cost),
            cleaning_fee: from_minor_units(m.cleaning_fee),
            service_fee: from_minor_units(m.service_fee),
            taxes: from_minor_units(m.taxes),
            total: from_minor_units(m.total_amount),
        },
        status,
        confirmation_code: m.confirmation_code,
        cancellation,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn domain_to_active(r: &Reservation) -> DomainResult<reservation::ActiveModel> {
    let c = r.cancellation.as_ref();
    Ok(reservation::ActiveModel {
        id: if r.id == 0 { NotSet } else { Set(r.id) },
        booking_id: Set(r.booking_id.clone()),
        property_id: Set(r.property_id),
        guest_id: Set(r.guest_id.clone()),
        check_in_date: Set(r.check_in),
        check_out_date: Set(r.check_out),
        nights: Set(column_int(r.nights, "nights")?),
        guest_count: Set(column_int(r.guest_count, "guest_count")?),
        special_requests: Set(r.special_requests.clone()),
        accommodation_cost: Set(cents(r.cost.accommodation_cost, "accommodation_cost")?),
        cleaning_fee: Set(cents(r.cost.cleaning_fee, "cleaning_fee")?),
        service_fee: Set(cents(r.cost.service_fee, "service_fee")?),
        taxes: Set(cents(r.cost.taxes, "taxes")?),
        total_amount: Set(cents(r.cost.total, "total")?),
        status: Set(r.status.as_str().to_string()),
        confirmation_code: Set(r.confirmation_code.clone()),
        cancelled_at: Set(c.map(|c| c.cancelled_at)),
        cancellation_reason: Set(c.map(|c| c.reason.as_str().to_string())),
        cancellation_notes: Set(c.and_then(|c| c.notes.clone())),
        refund_amount: Set(c.map(|c| cents(c.refund_amount, "refund_amount")).transpose()?),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    })
}

/// Map a failed write. An abort from the overlap guard becomes an
/// availability error; everything else is a storage failure.
fn write_err(e: DbErr, check_in: NaiveDate, check_out: NaiveDate) -> DomainError {
    if e.to_string().contains(OVERLAP_GUARD_MESSAGE) {
        warn!(%check_in, %check_out, "Overlap guard rejected reservation write");
        AvailabilityError::Unavailable {
            check_in,
            check_out,
            conflicting_reservation_id: None,
        }
        .into()
    } else {
        db_err(e)
    }
}

/// Confirmed or checked-in reservations of a property overlapping
/// `[check_in, check_out)`.
async fn blocking_in<C: ConnectionTrait>(
    conn: &C,
    property_id: i32,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> Result<Vec<reservation::Model>, DbErr> {
    reservation::Entity::find()
        .filter(reservation::Column::PropertyId.eq(property_id))
        .filter(
            reservation::Column::Status
                .is_in(ReservationStatus::BLOCKING.iter().map(|s| s.as_str())),
        )
        .filter(reservation::Column::CheckInDate.lt(check_out))
        .filter(reservation::Column::CheckOutDate.gt(check_in))
        .order_by_asc(reservation::Column::CheckInDate)
        .all(conn)
        .await
}

async fn unused_booking_id<C: ConnectionTrait>(conn: &C) -> DomainResult<String> {
    for _ in 0..BOOKING_ID_ATTEMPTS {
        let candidate = generate_booking_id();
        let taken = reservation::Entity::find()
            .filter(reservation::Column::BookingId.eq(candidate.as_str()))
            .one(conn)
            .await
            .map_err(db_err)?
            .is_some();
        if !taken {
            return Ok(candidate);
        }
    }
    Err(DomainError::Storage(
        "could not allocate a unique booking reference".to_string(),
    ))
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn insert_if_available(
        &self,
        property: &Property,
        stay: &StayRequest,
        new: NewReservation,
        policy: &PricingPolicy,
        now: DateTime<Utc>,
    ) -> DomainResult<Reservation> {
        let txn = self.begin().await?;

        let existing = blocking_in(&txn, property.id, stay.check_in, stay.check_out)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(model_to_domain)
            .collect::<DomainResult<Vec<_>>>()?;

        let cost = check_and_price(property, stay, &existing, policy)?;

        let blocked = blocked_in_range(&txn, property.id, stay.check_in, stay.check_out)
            .await
            .map_err(db_err)?;
        if !blocked.is_empty() {
            return Err(DomainError::DatesBlocked {
                dates: blocked.into_iter().map(|b| b.date).collect(),
            });
        }

        // check_and_price has validated the range and the length limits.
        let nights = stay.nights() as u32;
        let mut reservation = Reservation::pending(new, nights, cost, now);
        reservation.booking_id = unused_booking_id(&txn).await?;

        let saved = domain_to_active(&reservation)?
            .insert(&txn)
            .await
            .map_err(|e| write_err(e, stay.check_in, stay.check_out))?;
        txn.commit().await.map_err(db_err)?;

        debug!(
            reservation_id = saved.id,
            booking_id = %saved.booking_id,
            property_id = property.id,
            "Reservation inserted"
        );
        model_to_domain(saved)
    }

    async fn apply_transition(
        &self,
        id: i32,
        transition: Transition,
        now: DateTime<Utc>,
    ) -> DomainResult<Reservation> {
        let txn = self.begin().await?;

        let model = reservation::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Reservation", "id", id))?;

        let mut r = model_to_domain(model)?;
        r.apply(transition, now)?;

        if r.status.blocks_availability() {
            let conflict = blocking_in(&txn, r.property_id, r.check_in, r.check_out)
                .await
                .map_err(db_err)?
                .into_iter()
                .find(|other| other.id != r.id);
            if let Some(other) = conflict {
                return Err(AvailabilityError::Unavailable {
                    check_in: r.check_in,
                    check_out: r.check_out,
                    conflicting_reservation_id: Some(other.id),
                }
                .into());
            }
        }

        let updated = domain_to_active(&r)?
            .update(&txn)
            .await
            .map_err(|e| write_err(e, r.check_in, r.check_out))?;
        txn.commit().await.map_err(db_err)?;

        model_to_domain(updated)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_by_booking_id(&self, booking_id: &str) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find()
            .filter(reservation::Column::BookingId.eq(booking_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_filtered(&self, filter: &ReservationFilter) -> DomainResult<Vec<Reservation>> {
        let mut query = reservation::Entity::find();

        if let Some(property_id) = filter.property_id {
            query = query.filter(reservation::Column::PropertyId.eq(property_id));
        }
        if let Some(guest_id) = &filter.guest_id {
            query = query.filter(reservation::Column::GuestId.eq(guest_id.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(reservation::Column::Status.eq(status.as_str()));
        }

        let models = query
            .order_by_asc(reservation::Column::CheckInDate)
            .order_by_asc(reservation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_blocking(
        &self,
        property_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> DomainResult<Vec<Reservation>> {
        let models = blocking_in(&self.db, property_id, check_in, check_out)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_due_for_completion(&self, today: NaiveDate) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::Status.eq(ReservationStatus::CheckedOut.as_str()))
            .filter(reservation::Column::CheckOutDate.lte(today))
            .order_by_asc(reservation::Column::CheckOutDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }
}

// ── Tests ──────────────────────────────────────────────────────
