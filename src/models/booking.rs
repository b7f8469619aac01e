//! Booking model
//!
//! A booking is a customer's reservation against exactly one tour and
//! consumes that tour's single slot. The tour side of the relationship is
//! kept in sync by the booking service, not by the model.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::tour::TOUR_ID_RE;
use crate::error::AppResult;

/// Booking identifier pattern (B followed by 5 digits, e.g. B00001)
pub(crate) static BOOKING_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^B\d{5}$").expect("invalid booking id pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Booking {
    #[validate(regex(path = *BOOKING_ID_RE, message = "Booking ID must match B00001 format"))]
    pub id: String,
    #[validate(length(min = 2, max = 50, message = "Customer name must be 2-50 characters"))]
    pub customer_name: String,
    #[validate(regex(path = *TOUR_ID_RE, message = "Tour ID must match T00001 format"))]
    pub tour_id: String,
    /// Must be strictly before the referenced tour's departure date;
    /// checked by the booking service, which knows the tour
    pub booking_date: NaiveDate,
    #[validate(length(min = 1, message = "Phone cannot be empty"))]
    pub phone: String,
}

impl Booking {
    pub fn new(
        id: impl Into<String>,
        customer_name: impl Into<String>,
        tour_id: impl Into<String>,
        booking_date: NaiveDate,
        phone: impl Into<String>,
    ) -> AppResult<Self> {
        let booking = Self {
            id: id.into(),
            customer_name: customer_name.into(),
            tour_id: tour_id.into(),
            booking_date,
            phone: phone.into(),
        };
        booking.validate()?;
        Ok(booking)
    }
}
