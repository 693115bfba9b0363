//! Domain layer: entities, the availability evaluator and repository traits.

pub mod availability;
pub mod blocked_date;
pub mod property;
pub mod repositories;
pub mod reservation;

pub use availability::{AvailabilityError, CostBreakdown, PricingPolicy, StayRequest};
pub use blocked_date::{BlockReason, BlockedDate};
pub use property::{Property, PropertyStatus, PropertyType};
pub use repositories::RepositoryProvider;
pub use reservation::{CancellationReason, Reservation, ReservationStatus, Transition};

pub use crate::shared::errors::{DomainError, DomainResult};
