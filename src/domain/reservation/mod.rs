//! Reservation aggregate
//!
//! Contains the Reservation entity, its lifecycle, and repository interface.

pub mod model;
pub mod repository;

pub use model::{
    generate_booking_id, generate_confirmation_code, Cancellation, CancellationReason,
    NewReservation, Reservation, ReservationStatus, Transition,
};
pub use repository::{ReservationFilter, ReservationRepository};
