//! Availability & pricing evaluator
//!
//! Pure functions over a property, a requested stay and the property's
//! reservation set. Nothing here touches storage; callers load the inputs
//! and persist the results.

pub mod evaluator;
pub mod pricing;
pub mod refund;

pub use evaluator::{check_and_price, ranges_overlap, validate_stay, AvailabilityError, StayRequest};
pub use pricing::{from_minor_units, round_money, to_minor_units, CostBreakdown, PricingPolicy};
pub use refund::compute_refund;

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    use super::pricing::CostBreakdown;
    use crate::domain::property::{Property, PropertyStatus, PropertyType};
    use crate::domain::reservation::{Reservation, ReservationStatus};

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    pub fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    /// 100.00/night, 20.00 cleaning, 1..=30 nights, up to 4 guests.
    pub fn property() -> Property {
        let now = Utc::now();
        Property {
            id: 1,
            host_id: "host-1".to_string(),
            title: "Harbour loft".to_string(),
            description: String::new(),
            city: "Lisbon".to_string(),
            state: "Lisboa".to_string(),
            country: "PT".to_string(),
            property_type: PropertyType::EntirePlace,
            nightly_rate: dec("100.00"),
            cleaning_fee: dec("20.00"),
            security_deposit: dec("150.00"),
            min_nights: 1,
            max_nights: 30,
            max_guests: 4,
            advance_booking_days: 1,
            status: PropertyStatus::Active,
            is_available: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn reservation(id: i32, check_in: &str, check_out: &str, status: ReservationStatus) -> Reservation {
        let now = Utc::now();
        let check_in = date(check_in);
        let check_out = date(check_out);
        Reservation {
            id,
            booking_id: format!("BK{:08}", id),
            property_id: 1,
            guest_id: "guest-1".to_string(),
            check_in,
            check_out,
            nights: (check_out - check_in).num_days() as u32,
            guest_count: 2,
            special_requests: None,
            cost: CostBreakdown {
                accommodation_cost: Decimal::ZERO,
                cleaning_fee: Decimal::ZERO,
                service_fee: Decimal::ZERO,
                taxes: Decimal::ZERO,
                total: Decimal::ZERO,
            },
            status,
            confirmation_code: None,
            cancellation: None,
            created_at: now,
            updated_at: now,
        }
    }
}
