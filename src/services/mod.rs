//! Business logic services
//!
//! The services own every cross-entity rule: tour capacity and overlap
//! checks, the booking/tour availability synchronization, and the
//! statistics aggregation. Repositories stay rule-free.

pub mod bookings;
pub mod homestays;
pub mod stats;
pub mod tours;

use chrono::NaiveDate;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub homestays: homestays::HomestayService,
    pub tours: tours::TourService,
    pub bookings: bookings::BookingService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            homestays: homestays::HomestayService::new(repository.clone()),
            tours: tours::TourService::new(repository.clone()),
            bookings: bookings::BookingService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        }
    }
}

/// Today in local time, as the calendar date business rules compare against
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
