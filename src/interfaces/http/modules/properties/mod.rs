//! Property listings, quotes and host-blocked dates

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
