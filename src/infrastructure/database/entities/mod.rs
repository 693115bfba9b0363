//! Database entities module

pub mod blocked_date;
pub mod property;
pub mod reservation;

pub use blocked_date::Entity as BlockedDate;
pub use property::Entity as Property;
pub use reservation::Entity as Reservation;
