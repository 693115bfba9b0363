//! Cancellation refund policy.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::pricing::round_money;
use crate::domain::reservation::{Reservation, ReservationStatus};

/// Days before check-in from which the full amount is refunded.
pub const FULL_REFUND_DAYS: i64 = 7;
/// Days before check-in from which half the amount is refunded.
pub const HALF_REFUND_DAYS: i64 = 3;

/// Refund due if `reservation` were cancelled at `now`.
///
/// Zero unless the reservation is pending or confirmed and its check-in
/// date lies in the future. Otherwise a step function of the whole days
/// left before check-in: `>= 7` full, `3..7` half, `< 3` nothing.
pub fn compute_refund(reservation: &Reservation, now: DateTime<Utc>) -> Decimal {
    if !matches!(
        reservation.status,
        ReservationStatus::Pending | ReservationStatus::Confirmed
    ) {
        return Decimal::ZERO;
    }

    let today = now.date_naive();
    if today >= reservation.check_in {
        return Decimal::ZERO;
    }

    let days_until_check_in = (reservation.check_in - today).num_days();
    let total = reservation.cost.total;

    if days_until_check_in >= FULL_REFUND_DAYS {
        total
    } else if days_until_check_in >= HALF_REFUND_DAYS {
        round_money(total * Decimal::new(5, 1))
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::availability::testing::{date, dec, reservation};
    use chrono::{Duration, NaiveDate, TimeZone};

    fn noon(day: NaiveDate) -> DateTime<Utc> {
        Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
    }

    fn confirmed_on(check_in: &str) -> Reservation {
        let check_in = date(check_in);
        let check_out = check_in + Duration::days(3);
        let mut r = reservation(1, &check_in.to_string(), &check_out.to_string(), ReservationStatus::Confirmed);
        r.cost.total = dec("376.40");
        r
    }

    fn refund_with_days_left(days: i64) -> Decimal {
        let r = confirmed_on("2024-07-20");
        compute_refund(&r, noon(r.check_in - Duration::days(days)))
    }

    #[test]
    fn five_days_out_refunds_half() {
        assert_eq!(refund_with_days_left(5), dec("188.20"));
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(refund_with_days_left(7), dec("376.40"));
        assert_eq!(refund_with_days_left(6), dec("188.20"));
        assert_eq!(refund_with_days_left(3), dec("188.20"));
        assert_eq!(refund_with_days_left(2), Decimal::ZERO);
        assert_eq!(refund_with_days_left(1), Decimal::ZERO);
    }

    #[test]
    fn refund_never_increases_as_check_in_approaches() {
        let mut previous = refund_with_days_left(30);
        for days in (1..30).rev() {
            let current = refund_with_days_left(days);
            assert!(current <= previous, "refund rose at d={days}");
            previous = current;
        }
    }

    #[test]
    fn nothing_once_the_stay_has_begun() {
        let r = confirmed_on("2024-07-20");
        assert_eq!(compute_refund(&r, noon(r.check_in)), Decimal::ZERO);
        assert_eq!(compute_refund(&r, noon(r.check_in + Duration::days(1))), Decimal::ZERO);
    }

    #[test]
    fn only_pending_or_confirmed_are_refundable() {
        let mut r = confirmed_on("2024-07-20");
        let now = noon(r.check_in - Duration::days(10));

        r.status = ReservationStatus::Pending;
        assert_eq!(compute_refund(&r, now), dec("376.40"));

        for status in [
            ReservationStatus::CheckedIn,
            ReservationStatus::CheckedOut,
            ReservationStatus::Cancelled,
            ReservationStatus::Completed,
        ] {
            r.status = status;
            assert_eq!(compute_refund(&r, now), Decimal::ZERO, "{status}");
        }
    }

    #[test]
    fn half_refund_rounds_half_up() {
        let mut r = confirmed_on("2024-07-20");
        r.cost.total = dec("100.05");
        let refund = compute_refund(&r, noon(r.check_in - Duration::days(4)));
        assert_eq!(refund, dec("50.03"));
    }
}
