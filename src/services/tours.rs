//! Tour management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::Tour,
    repository::Repository,
};

use super::today;

#[derive(Clone)]
pub struct TourService {
    repository: Repository,
}

impl TourService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All tours in store order
    pub fn list(&self) -> Vec<Tour> {
        self.repository.tours.find_all()
    }

    pub fn get(&self, id: &str) -> AppResult<Tour> {
        self.repository
            .tours
            .find_by_id(id)
            .ok_or_else(|| AppError::NotFound(format!("Tour {} not found", id)))
    }

    /// Add a tour after running the full business validation:
    /// the homestay must exist, its capacity must cover the headcount, the
    /// dates must be valid, and the date range must not overlap any other
    /// tour at the same homestay (closed-interval rule). Field invariants
    /// were already enforced when the tour was constructed.
    pub fn create_tour(&self, tour: Tour) -> AppResult<()> {
        let homestay = self
            .repository
            .homestays
            .find_by_id(&tour.homestay_id)
            .ok_or_else(|| {
                AppError::BusinessRule(format!("Homestay {} does not exist", tour.homestay_id))
            })?;

        if tour.tourist_count > homestay.max_capacity {
            return Err(AppError::BusinessRule(format!(
                "Number of tourists exceeds homestay capacity ({})",
                homestay.max_capacity
            )));
        }

        if !tour.has_valid_dates() {
            return Err(AppError::BusinessRule(
                "Departure date must be before end date".to_string(),
            ));
        }

        if let Some(conflict) = self.repository.tours.find_overlapping(&tour, None) {
            return Err(AppError::BusinessRule(format!(
                "Tour dates overlap with existing tour {}",
                conflict.id
            )));
        }

        let tour_id = tour.id.clone();
        if !self.repository.tours.save(tour) {
            return Err(AppError::Conflict(format!("Tour {} already exists", tour_id)));
        }
        Ok(())
    }

    /// Update a tour, re-checking capacity and, when the dates moved,
    /// re-running the overlap rule against every other tour at the homestay
    pub fn update_tour(&self, new_tour: Tour, old_tour: &Tour) -> AppResult<()> {
        new_tour.validate()?;

        if let Some(homestay) = self.repository.homestays.find_by_id(&new_tour.homestay_id) {
            if new_tour.tourist_count > homestay.max_capacity {
                return Err(AppError::BusinessRule(format!(
                    "Number of tourists exceeds homestay capacity ({})",
                    homestay.max_capacity
                )));
            }
        }

        let dates_changed = new_tour.departure_date != old_tour.departure_date
            || new_tour.end_date != old_tour.end_date;
        if dates_changed {
            if let Some(conflict) = self
                .repository
                .tours
                .find_overlapping(&new_tour, Some(&new_tour.id))
            {
                return Err(AppError::BusinessRule(format!(
                    "Updated tour dates overlap with existing tour {}",
                    conflict.id
                )));
            }
        }

        let tour_id = new_tour.id.clone();
        if !self.repository.tours.update(new_tour) {
            return Err(AppError::NotFound(format!("Tour {} not found", tour_id)));
        }
        Ok(())
    }

    /// Tours departing after today, ordered by total revenue descending
    pub fn upcoming_tours(&self) -> Vec<Tour> {
        self.repository.tours.find_departing_after(today())
    }

    /// Tours whose departure date has already passed
    pub fn expired_tours(&self) -> Vec<Tour> {
        self.repository.tours.find_departing_before(today())
    }

    pub fn tours_by_homestay(&self, homestay_id: &str) -> Vec<Tour> {
        self.repository.tours.find_by_homestay(homestay_id)
    }
}
