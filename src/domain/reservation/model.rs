//! Reservation domain entity and its status machine

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use crate::domain::availability::{compute_refund, CostBreakdown};
use crate::domain::{DomainError, DomainResult};

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationStatus {
    /// Requested by the guest, awaiting host confirmation
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked_in",
            Self::CheckedOut => "checked_out",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "checked_in" => Some(Self::CheckedIn),
            "checked_out" => Some(Self::CheckedOut),
            "cancelled" => Some(Self::Cancelled),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Statuses that occupy the property's calendar
    pub const BLOCKING: [ReservationStatus; 2] = [Self::Confirmed, Self::CheckedIn];

    pub fn blocks_availability(&self) -> bool {
        Self::BLOCKING.contains(self)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// The status reached by applying `transition`, or `InvalidTransition`
    /// if the pair is not part of the lifecycle.
    pub fn transition(self, transition: &Transition) -> DomainResult<ReservationStatus> {
        use ReservationStatus::*;

        let next = match (self, transition) {
            (Pending, Transition::Confirm) => Confirmed,
            (Confirmed, Transition::CheckIn) => CheckedIn,
            (CheckedIn, Transition::CheckOut) => CheckedOut,
            (CheckedOut, Transition::Complete) => Completed,
            (Pending | Confirmed, Transition::Cancel { .. }) => Cancelled,
            (from, t) => {
                return Err(DomainError::InvalidTransition {
                    from,
                    action: t.action(),
                })
            }
        };
        Ok(next)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a reservation was cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationReason {
    GuestRequest,
    HostCancelled,
    PaymentFailed,
    PolicyViolation,
    Emergency,
}

impl CancellationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GuestRequest => "guest_request",
            Self::HostCancelled => "host_cancelled",
            Self::PaymentFailed => "payment_failed",
            Self::PolicyViolation => "policy_violation",
            Self::Emergency => "emergency",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "guest_request" => Some(Self::GuestRequest),
            "host_cancelled" => Some(Self::HostCancelled),
            "payment_failed" => Some(Self::PaymentFailed),
            "policy_violation" => Some(Self::PolicyViolation),
            "emergency" => Some(Self::Emergency),
            _ => None,
        }
    }
}

impl std::fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recorded when a reservation is cancelled
#[derive(Debug, Clone, PartialEq)]
pub struct Cancellation {
    pub cancelled_at: DateTime<Utc>,
    pub reason: CancellationReason,
    pub notes: Option<String>,
    pub refund_amount: Decimal,
}

/// A requested lifecycle step
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Confirm,
    CheckIn,
    CheckOut,
    Complete,
    Cancel {
        reason: CancellationReason,
        notes: Option<String>,
    },
}

impl Transition {
    /// Verb used in error messages and logs
    pub fn action(&self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::CheckIn => "check in",
            Self::CheckOut => "check out",
            Self::Complete => "complete",
            Self::Cancel { .. } => "cancel",
        }
    }
}

/// A guest's stay at a property over `[check_in, check_out)`
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: i32,
    /// Public reference, `BK` followed by 8 digits
    pub booking_id: String,
    pub property_id: i32,
    pub guest_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub guest_count: u32,
    pub special_requests: Option<String>,
    /// Price fixed at booking time
    pub cost: CostBreakdown,
    pub status: ReservationStatus,
    /// Assigned on confirmation
    pub confirmation_code: Option<String>,
    pub cancellation: Option<Cancellation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a reservation; the store assigns `id`.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub property_id: i32,
    pub guest_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_count: u32,
    pub special_requests: Option<String>,
}

impl Reservation {
    /// Build a pending reservation from a priced request.
    pub fn pending(new: NewReservation, nights: u32, cost: CostBreakdown, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            booking_id: generate_booking_id(),
            property_id: new.property_id,
            guest_id: new.guest_id,
            check_in: new.check_in,
            check_out: new.check_out,
            nights,
            guest_count: new.guest_count,
            special_requests: new.special_requests,
            cost,
            status: ReservationStatus::Pending,
            confirmation_code: None,
            cancellation: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a lifecycle step.
    ///
    /// Only status legality and the reservation's own data are checked here;
    /// calendar conflicts on entering a blocking status are the store's job.
    pub fn apply(&mut self, transition: Transition, now: DateTime<Utc>) -> DomainResult<()> {
        let next = self.status.transition(&transition)?;

        match transition {
            Transition::Confirm => {
                self.confirmation_code = Some(generate_confirmation_code());
            }
            Transition::Cancel { reason, notes } => {
                if now.date_naive() >= self.check_in {
                    return Err(DomainError::Conflict(format!(
                        "Stay {} has already begun and can no longer be cancelled",
                        self.booking_id
                    )));
                }
                // Refund depends on the pre-cancellation status.
                let refund_amount = compute_refund(self, now);
                self.cancellation = Some(Cancellation {
                    cancelled_at: now,
                    reason,
                    notes,
                    refund_amount,
                });
            }
            Transition::CheckIn | Transition::CheckOut | Transition::Complete => {}
        }

        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }
}

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// `BK` followed by 8 random digits
pub fn generate_booking_id() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..100_000_000);
    format!("BK{:08}", n)
}

/// 6 characters drawn from `A-Z0-9`
pub fn generate_confirmation_code() -> String {
    let mut rng = rand::thread_rng();
    (0..6)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::availability::testing::{date, dec, reservation};
    use chrono::{Duration, TimeZone};

    fn at(day: &str) -> DateTime<Utc> {
        Utc.from_utc_datetime(&date(day).and_hms_opt(10, 0, 0).unwrap())
    }

    fn cancel() -> Transition {
        Transition::Cancel {
            reason: CancellationReason::GuestRequest,
            notes: Some("plans changed".into()),
        }
    }

    #[test]
    fn happy_path_walks_the_lifecycle() {
        let mut r = reservation(1, "2024-07-10", "2024-07-13", ReservationStatus::Pending);
        let steps = [
            (Transition::Confirm, ReservationStatus::Confirmed),
            (Transition::CheckIn, ReservationStatus::CheckedIn),
            (Transition::CheckOut, ReservationStatus::CheckedOut),
            (Transition::Complete, ReservationStatus::Completed),
        ];
        for (t, expected) in steps {
            r.apply(t, at("2024-07-01")).unwrap();
            assert_eq!(r.status, expected);
        }
        assert!(!r.is_active());
    }

    #[test]
    fn confirm_assigns_a_code() {
        let mut r = reservation(1, "2024-07-10", "2024-07-13", ReservationStatus::Pending);
        assert!(r.confirmation_code.is_none());
        r.apply(Transition::Confirm, at("2024-07-01")).unwrap();

        let code = r.confirmation_code.unwrap();
        assert_eq!(code.len(), 6);
        assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn illegal_pairs_are_rejected_without_change() {
        use ReservationStatus::*;
        let illegal = [
            (Pending, Transition::CheckIn),
            (Pending, Transition::Complete),
            (Confirmed, Transition::Confirm),
            (Confirmed, Transition::CheckOut),
            (CheckedIn, cancel()),
            (CheckedOut, cancel()),
            (Cancelled, Transition::Confirm),
            (Completed, Transition::CheckIn),
        ];
        for (from, t) in illegal {
            let mut r = reservation(1, "2024-07-10", "2024-07-13", from);
            let err = r.apply(t.clone(), at("2024-07-01")).unwrap_err();
            assert!(
                matches!(err, DomainError::InvalidTransition { from: f, .. } if f == from),
                "{from} -> {}",
                t.action()
            );
            assert_eq!(r.status, from);
        }
    }

    #[test]
    fn cancel_records_refund_from_the_prior_status() {
        let mut r = reservation(1, "2024-07-20", "2024-07-23", ReservationStatus::Confirmed);
        r.cost.total = dec("376.40");

        let now = at("2024-07-15");
        r.apply(cancel(), now).unwrap();

        assert_eq!(r.status, ReservationStatus::Cancelled);
        let c = r.cancellation.unwrap();
        assert_eq!(c.refund_amount, dec("188.20"));
        assert_eq!(c.reason, CancellationReason::GuestRequest);
        assert_eq!(c.cancelled_at, now);
        assert_eq!(c.notes.as_deref(), Some("plans changed"));
    }

    #[test]
    fn cannot_cancel_once_the_stay_begins() {
        let mut r = reservation(1, "2024-07-20", "2024-07-23", ReservationStatus::Confirmed);
        let err = r.apply(cancel(), at("2024-07-20")).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(r.status, ReservationStatus::Confirmed);
        assert!(r.cancellation.is_none());
    }

    #[test]
    fn pending_builder_sets_defaults() {
        let now = at("2024-07-01");
        let r = Reservation::pending(
            NewReservation {
                property_id: 3,
                guest_id: "guest-9".into(),
                check_in: date("2024-07-10"),
                check_out: date("2024-07-12"),
                guest_count: 2,
                special_requests: None,
            },
            2,
            CostBreakdown::default(),
            now,
        );
        assert_eq!(r.status, ReservationStatus::Pending);
        assert_eq!(r.updated_at, now);
        assert!(r.booking_id.starts_with("BK"));
        assert_eq!(r.booking_id.len(), 10);
        assert!(r.booking_id[2..].bytes().all(|b| b.is_ascii_digit()));
        assert_eq!(r.check_out - r.check_in, Duration::days(2));
    }

    #[test]
    fn status_strings_roundtrip() {
        use ReservationStatus::*;
        for s in [Pending, Confirmed, CheckedIn, CheckedOut, Cancelled, Completed] {
            assert_eq!(ReservationStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(ReservationStatus::parse("Accepted"), None);
        assert_eq!(CancellationReason::parse("emergency"), Some(CancellationReason::Emergency));
    }
}
