//! # Stay Booking
//!
//! Availability, pricing and reservation lifecycle for short-term rental
//! listings, served over a REST API.
//!
//! ## Architecture
//!
//! - **domain**: Listings, reservations, blocked dates, the availability
//!   evaluator and the pricing/refund policy
//! - **application**: The booking service that serializes bookings per
//!   property, plus the stay completion task
//! - **infrastructure**: SeaORM entities, migrations and repositories
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: Process bootstrap and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
