//! Availability check and price quote for a requested stay.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::pricing::{CostBreakdown, PricingPolicy};
use crate::domain::property::Property;
use crate::domain::reservation::Reservation;

/// A requested stay over the half-open interval `[check_in, check_out)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_count: u32,
}

impl StayRequest {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate, guest_count: u32) -> Self {
        Self {
            check_in,
            check_out,
            guest_count,
        }
    }

    /// Number of nights; zero or negative for an invalid range.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// Why a stay cannot be booked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AvailabilityError {
    #[error("Check-out {check_out} must be after check-in {check_in}")]
    InvalidRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("Stay of {nights} night(s) is outside the allowed {min_nights}..={max_nights}")]
    StayLengthViolation {
        nights: i64,
        min_nights: u32,
        max_nights: u32,
    },

    #[error("Requested {requested} guests, maximum is {max_guests}")]
    CapacityViolation { requested: u32, max_guests: u32 },

    #[error("Property is already booked between {check_in} and {check_out}")]
    Unavailable {
        check_in: NaiveDate,
        check_out: NaiveDate,
        /// Reservation that occupies the dates, when known
        conflicting_reservation_id: Option<i32>,
    },
}

impl AvailabilityError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRange { .. } => "invalid_range",
            Self::StayLengthViolation { .. } => "stay_length_violation",
            Self::CapacityViolation { .. } => "capacity_violation",
            Self::Unavailable { .. } => "unavailable",
        }
    }
}

/// Standard half-open interval overlap test: `[a, b)` and `[c, d)` overlap
/// iff `a < d && c < b`. Touching endpoints do not overlap.
pub fn ranges_overlap(a: NaiveDate, b: NaiveDate, c: NaiveDate, d: NaiveDate) -> bool {
    a < d && c < b
}

/// Steps 1-3 of the evaluation: range, stay length, capacity.
/// Returns the number of nights.
pub fn validate_stay(property: &Property, stay: &StayRequest) -> Result<u32, AvailabilityError> {
    if stay.check_in >= stay.check_out {
        return Err(AvailabilityError::InvalidRange {
            check_in: stay.check_in,
            check_out: stay.check_out,
        });
    }

    let nights = stay.nights();
    if nights < i64::from(property.min_nights) || nights > i64::from(property.max_nights) {
        return Err(AvailabilityError::StayLengthViolation {
            nights,
            min_nights: property.min_nights,
            max_nights: property.max_nights,
        });
    }

    if stay.guest_count > property.max_guests {
        return Err(AvailabilityError::CapacityViolation {
            requested: stay.guest_count,
            max_guests: property.max_guests,
        });
    }

    // Bounded by max_nights (a u32) above.
    Ok(nights as u32)
}

/// Decide whether `stay` may be booked at `property` and price it.
///
/// `existing` is the property's reservation set; only confirmed and
/// checked-in reservations block. Checks run in order and stop at the
/// first violation.
pub fn check_and_price(
    property: &Property,
    stay: &StayRequest,
    existing: &[Reservation],
    policy: &PricingPolicy,
) -> Result<CostBreakdown, AvailabilityError> {
    let nights = validate_stay(property, stay)?;

    if let Some(conflict) = existing.iter().find(|r| {
        r.property_id == property.id
            && r.status.blocks_availability()
            && ranges_overlap(r.check_in, r.check_out, stay.check_in, stay.check_out)
    }) {
        return Err(AvailabilityError::Unavailable {
            check_in: stay.check_in,
            check_out: stay.check_out,
            conflicting_reservation_id: Some(conflict.id),
        });
    }

    Ok(policy.price(property.nightly_rate, property.cleaning_fee, nights))
}
