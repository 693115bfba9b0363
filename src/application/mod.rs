//! Application layer: booking use cases and background tasks

pub mod services;

pub use services::{
    start_stay_completion_task, BookingOptions, BookingService, CreateBooking, Quote,
};
