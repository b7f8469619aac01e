//! Homestay lookup service

use crate::{
    error::{AppError, AppResult},
    models::Homestay,
    repository::Repository,
};

#[derive(Clone)]
pub struct HomestayService {
    repository: Repository,
}

impl HomestayService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All homestays in store order
    pub fn list(&self) -> Vec<Homestay> {
        self.repository.homestays.find_all()
    }

    pub fn get(&self, id: &str) -> AppResult<Homestay> {
        self.repository
            .homestays
            .find_by_id(id)
            .ok_or_else(|| AppError::NotFound(format!("Homestay {} not found", id)))
    }

    /// Case-insensitive substring search over homestay names
    pub fn find_by_name(&self, name: &str) -> Vec<Homestay> {
        self.repository.homestays.find_by_name(name)
    }

    /// Whether the homestay exists and can host the given headcount
    pub fn can_accommodate(&self, homestay_id: &str, tourist_count: u32) -> bool {
        self.repository
            .homestays
            .find_by_id(homestay_id)
            .map(|h| h.can_accommodate(tourist_count))
            .unwrap_or(false)
    }
}
