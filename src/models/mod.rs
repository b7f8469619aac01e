//! Data models for the homestay booking core

pub mod booking;
pub mod homestay;
pub mod tour;

// Re-export commonly used types
pub use booking::Booking;
pub use homestay::Homestay;
pub use tour::{Tour, TourStatus};
