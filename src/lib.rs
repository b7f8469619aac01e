//! Homestay Booking Management System
//!
//! Core consistency and validation layer for a small travel-booking
//! inventory: homestay facilities, dated tours held at a facility, and
//! customer bookings that consume a tour's single slot. State lives in
//! memory, persisted through line-oriented text files that tolerate
//! malformed input.

pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
