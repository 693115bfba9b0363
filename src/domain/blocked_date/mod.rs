//! Host-blocked calendar days

pub mod model;
pub mod repository;

pub use model::{BlockReason, BlockedDate};
pub use repository::BlockedDateRepository;
