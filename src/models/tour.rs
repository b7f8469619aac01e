//! Tour model and related types
//!
//! Business rules carried by the model itself:
//! - duration label of the form "N days M nights" with M == N-1
//! - departure strictly before end, at most 30 days apart
//! - tours sharing a homestay must not overlap (closed-interval test)

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::homestay::HOMESTAY_ID_RE;
use crate::error::AppResult;

/// Tour identifier pattern (T followed by 5 digits, e.g. T00001)
pub(crate) static TOUR_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^T\d{5}$").expect("invalid tour id pattern"));

static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\s+days?\s+\d+\s+nights?$").expect("invalid duration pattern"));

/// Longest allowed tour, in days between departure and end
const MAX_TOUR_DAYS: i64 = 30;

/// Tour status, derived from dates and the booked flag.
/// Priority: Expired > Booked > Available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TourStatus {
    Available,
    Booked,
    Expired,
}

impl std::fmt::Display for TourStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TourStatus::Available => "Available",
            TourStatus::Booked => "Booked",
            TourStatus::Expired => "Expired",
        };
        write!(f, "{}", label)
    }
}

/// A dated, priced excursion offered at one homestay, with a fixed headcount
/// consuming a single bookable slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = validate_tour_dates))]
pub struct Tour {
    #[validate(regex(path = *TOUR_ID_RE, message = "Tour ID must match T00001 format"))]
    pub id: String,
    #[validate(length(min = 1, message = "Tour name cannot be empty"))]
    pub name: String,
    /// Duration label, e.g. "3 days 2 nights"
    #[validate(custom(function = validate_duration_label))]
    pub duration_label: String,
    #[validate(custom(function = validate_price))]
    pub price_per_person: Decimal,
    #[validate(regex(path = *HOMESTAY_ID_RE, message = "Homestay ID must match HS0001 format"))]
    pub homestay_id: String,
    pub departure_date: NaiveDate,
    pub end_date: NaiveDate,
    pub tourist_count: u32,
    /// Maintained incrementally by the booking service; true iff exactly one
    /// live booking references this tour
    pub booked: bool,
}

impl Tour {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        duration_label: impl Into<String>,
        price_per_person: Decimal,
        homestay_id: impl Into<String>,
        departure_date: NaiveDate,
        end_date: NaiveDate,
        tourist_count: u32,
        booked: bool,
    ) -> AppResult<Self> {
        let tour = Self {
            id: id.into(),
            name: name.into(),
            duration_label: duration_label.into(),
            price_per_person,
            homestay_id: homestay_id.into(),
            departure_date,
            end_date,
            tourist_count,
            booked,
        };
        tour.validate()?;
        Ok(tour)
    }

    /// Total revenue for this tour: price per person times headcount
    pub fn total_amount(&self) -> Decimal {
        self.price_per_person * Decimal::from(self.tourist_count)
    }

    /// A tour is expired once its departure date has passed
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.departure_date < today
    }

    /// A tour is upcoming while its departure date is in the future
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.departure_date > today
    }

    pub fn has_valid_dates(&self) -> bool {
        self.departure_date < self.end_date
    }

    /// Closed-interval overlap test against another tour.
    ///
    /// Only tours sharing a homestay can conflict. The interval test is
    /// inclusive on both ends: a tour ending the day another begins counts
    /// as overlapping.
    pub fn overlaps_with(&self, other: &Tour) -> bool {
        if !self.homestay_id.eq_ignore_ascii_case(&other.homestay_id) {
            return false;
        }
        self.departure_date <= other.end_date && other.departure_date <= self.end_date
    }

    pub fn status(&self, today: NaiveDate) -> TourStatus {
        if self.is_expired(today) {
            return TourStatus::Expired;
        }
        if self.booked {
            return TourStatus::Booked;
        }
        TourStatus::Available
    }
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        let mut err = ValidationError::new("price");
        err.message = Some("Price cannot be negative".into());
        return Err(err);
    }
    Ok(())
}

fn validate_duration_label(label: &str) -> Result<(), ValidationError> {
    let format_err = || {
        let mut err = ValidationError::new("duration_label");
        err.message = Some("Invalid duration format. Use: 'N days M nights'".into());
        err
    };

    let label = label.trim();
    if !DURATION_RE.is_match(label) {
        return Err(format_err());
    }

    let parts: Vec<&str> = label.split_whitespace().collect();
    let days: i64 = parts[0].parse().map_err(|_| format_err())?;
    let nights: i64 = parts[2].parse().map_err(|_| format_err())?;

    if nights != days - 1 {
        let mut err = ValidationError::new("duration_label");
        err.message = Some(
            format!("Duration logic error: {} days should have {} nights", days, days - 1).into(),
        );
        return Err(err);
    }
    Ok(())
}

fn validate_tour_dates(tour: &Tour) -> Result<(), ValidationError> {
    if tour.end_date <= tour.departure_date {
        let mut err = ValidationError::new("dates");
        err.message = Some("End date must be after departure date".into());
        return Err(err);
    }
    if (tour.end_date - tour.departure_date).num_days() > MAX_TOUR_DAYS {
        let mut err = ValidationError::new("dates");
        err.message = Some(format!("Tour duration cannot exceed {} days", MAX_TOUR_DAYS).into());
        return Err(err);
    }
    Ok(())
}
