//! Booking management service
//!
//! The only component whose invariants span two stores: every mutation here
//! keeps a tour's `booked` flag synchronized with the single live booking
//! that may reference it. The whole of each mutation runs under one coarse
//! lock so no other operation can observe the intermediate state.

use std::sync::{Arc, Mutex, MutexGuard};

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::Booking,
    repository::Repository,
};

#[derive(Clone)]
pub struct BookingService {
    repository: Repository,
    mutation_lock: Arc<Mutex<()>>,
}

impl BookingService {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            mutation_lock: Arc::new(Mutex::new(())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.mutation_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// All bookings in store order
    pub fn list(&self) -> Vec<Booking> {
        self.repository.bookings.find_all()
    }

    pub fn get(&self, id: &str) -> AppResult<Booking> {
        self.repository
            .bookings
            .find_by_id(id)
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }

    /// Case-insensitive substring search over customer names
    pub fn find_by_customer_name(&self, name: &str) -> Vec<Booking> {
        self.repository.bookings.find_by_customer_name(name)
    }

    /// Add a booking and mark its tour as booked.
    ///
    /// The tour must exist, must not already be booked, and the booking
    /// date must be strictly before the tour's departure. The booking is
    /// saved before the tour is touched, so a duplicate booking ID aborts
    /// with no tour mutation at all.
    pub fn create_booking(&self, booking: Booking) -> AppResult<()> {
        let _guard = self.lock();

        let tour = self
            .repository
            .tours
            .find_by_id(&booking.tour_id)
            .ok_or_else(|| {
                AppError::BusinessRule(format!("Tour {} does not exist", booking.tour_id))
            })?;

        if tour.booked {
            return Err(AppError::BusinessRule(format!(
                "Tour {} is already booked",
                tour.id
            )));
        }

        if booking.booking_date >= tour.departure_date {
            return Err(AppError::BusinessRule(
                "Booking date must be before tour departure".to_string(),
            ));
        }

        let booking_id = booking.id.clone();
        if !self.repository.bookings.save(booking) {
            return Err(AppError::Conflict(format!(
                "Booking {} already exists",
                booking_id
            )));
        }

        let mut tour = tour;
        tour.booked = true;
        let tour_id = tour.id.clone();
        if !self.repository.tours.update(tour) {
            // The tour vanished between lookup and update. Roll the booking
            // save back so no reservation points at a tour that was never
            // marked booked.
            self.repository.bookings.delete(&booking_id);
            tracing::error!(
                "Booking {} rolled back: tour {} disappeared during creation",
                booking_id,
                tour_id
            );
            return Err(AppError::Internal(format!(
                "Failed to mark tour {} as booked",
                tour_id
            )));
        }
        Ok(())
    }

    /// Remove a booking, releasing its tour first.
    ///
    /// The tour-side release happens before the delete attempt; a booking
    /// whose tour no longer exists is still removable.
    pub fn remove_booking(&self, booking_id: &str) -> AppResult<()> {
        let _guard = self.lock();

        let booking = self
            .repository
            .bookings
            .find_by_id(booking_id)
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))?;

        if let Some(mut tour) = self.repository.tours.find_by_id(&booking.tour_id) {
            tour.booked = false;
            self.repository.tours.update(tour);
        }

        if self.repository.bookings.delete(booking_id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "Booking {} not found",
                booking_id
            )))
        }
    }

    /// Update a booking. When the referenced tour changes the old tour is
    /// released first and the new one locked after; if the new tour cannot
    /// be locked (missing or already booked) the release is reverted before
    /// reporting failure, so the old slot is never silently lost.
    pub fn update_booking(&self, new_booking: Booking, old_booking: &Booking) -> AppResult<()> {
        let _guard = self.lock();

        new_booking.validate()?;

        if new_booking.tour_id.eq_ignore_ascii_case(&old_booking.tour_id) {
            let booking_id = new_booking.id.clone();
            if !self.repository.bookings.update(new_booking) {
                return Err(AppError::NotFound(format!(
                    "Booking {} not found",
                    booking_id
                )));
            }
            return Ok(());
        }

        // Release the old tour before trying to lock the new one
        let released = match self.repository.tours.find_by_id(&old_booking.tour_id) {
            Some(mut old_tour) => {
                old_tour.booked = false;
                self.repository.tours.update(old_tour.clone());
                Some(old_tour)
            }
            None => None,
        };

        let revert_release = |reason: AppError| {
            if let Some(mut old_tour) = released.clone() {
                old_tour.booked = true;
                self.repository.tours.update(old_tour);
            }
            reason
        };

        let new_tour = match self.repository.tours.find_by_id(&new_booking.tour_id) {
            Some(t) => t,
            None => {
                return Err(revert_release(AppError::BusinessRule(format!(
                    "Tour {} does not exist",
                    new_booking.tour_id
                ))));
            }
        };

        if new_tour.booked {
            return Err(revert_release(AppError::BusinessRule(format!(
                "New tour {} is already booked",
                new_tour.id
            ))));
        }

        let mut new_tour = new_tour;
        new_tour.booked = true;
        self.repository.tours.update(new_tour);

        let booking_id = new_booking.id.clone();
        if !self.repository.bookings.update(new_booking) {
            return Err(AppError::NotFound(format!(
                "Booking {} not found",
                booking_id
            )));
        }
        Ok(())
    }
}
