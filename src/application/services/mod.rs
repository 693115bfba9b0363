pub mod booking;
pub mod stay_completion;

pub use booking::{BookingOptions, BookingService, CreateBooking, Quote};
pub use stay_completion::start_stay_completion_task;
