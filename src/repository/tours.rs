//! Tour repository
//!
//! Besides the uniform CRUD surface this store carries the tour-specific
//! queries the validation service relies on: lookups by homestay, by
//! departure date, by booked flag, and the overlap conflict probe. They are
//! part of the repository's public capability interface rather than hidden
//! behind a concrete-type downcast.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::codec;
use crate::error::AppResult;
use crate::models::Tour;

use super::{id_key, open_source, write_source};

#[derive(Clone)]
pub struct TourRepository {
    inner: Arc<RwLock<IndexMap<String, Tour>>>,
    path: PathBuf,
}

impl TourRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(IndexMap::new())),
            path: path.into(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, Tour>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, Tour>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// All tours, cloned out in insertion order
    pub fn find_all(&self) -> Vec<Tour> {
        self.read().values().cloned().collect()
    }

    /// Look up by ID, case-insensitively
    pub fn find_by_id(&self, id: &str) -> Option<Tour> {
        self.read().get(&id_key(id)).cloned()
    }

    /// Insert a new tour; fails (false) if the ID is already taken
    pub fn save(&self, tour: Tour) -> bool {
        let mut store = self.write();
        let key = id_key(&tour.id);
        if store.contains_key(&key) {
            return false;
        }
        store.insert(key, tour);
        true
    }

    /// Replace an existing tour in place; fails (false) if missing
    pub fn update(&self, tour: Tour) -> bool {
        let mut store = self.write();
        match store.get_mut(&id_key(&tour.id)) {
            Some(slot) => {
                *slot = tour;
                true
            }
            None => false,
        }
    }

    /// Remove by ID, reporting whether anything was removed
    pub fn delete(&self, id: &str) -> bool {
        self.write().shift_remove(&id_key(id)).is_some()
    }

    pub fn exists(&self, id: &str) -> bool {
        self.read().contains_key(&id_key(id))
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Tours held at the given homestay
    pub fn find_by_homestay(&self, homestay_id: &str) -> Vec<Tour> {
        self.read()
            .values()
            .filter(|t| t.homestay_id.eq_ignore_ascii_case(homestay_id))
            .cloned()
            .collect()
    }

    /// Tours departing strictly after the given date, ordered by total
    /// revenue, highest first
    pub fn find_departing_after(&self, date: NaiveDate) -> Vec<Tour> {
        let mut tours: Vec<Tour> = self
            .read()
            .values()
            .filter(|t| t.departure_date > date)
            .cloned()
            .collect();
        tours.sort_by(|a, b| b.total_amount().cmp(&a.total_amount()));
        tours
    }

    /// Tours departing strictly before the given date
    pub fn find_departing_before(&self, date: NaiveDate) -> Vec<Tour> {
        self.read()
            .values()
            .filter(|t| t.departure_date < date)
            .cloned()
            .collect()
    }

    /// Tours filtered by their booked flag
    pub fn find_by_booked(&self, booked: bool) -> Vec<Tour> {
        self.read()
            .values()
            .filter(|t| t.booked == booked)
            .cloned()
            .collect()
    }

    /// First stored tour whose date range overlaps the candidate's at the
    /// same homestay, if any. `exclude_id` skips the candidate's own stored
    /// version during updates.
    pub fn find_overlapping(&self, candidate: &Tour, exclude_id: Option<&str>) -> Option<Tour> {
        let exclude_key = exclude_id.map(id_key);
        self.read()
            .iter()
            .find(|(key, existing)| {
                if exclude_key.as_deref() == Some(key.as_str()) {
                    return false;
                }
                existing.overlaps_with(candidate)
            })
            .map(|(_, t)| t.clone())
    }

    /// Clear the store and reload it from the backing file. Returns the
    /// number of tours loaded; a missing file yields an empty store.
    pub fn load_from_source(&self) -> AppResult<usize> {
        let mut store = self.write();
        store.clear();
        let Some(reader) = open_source(&self.path)? else {
            return Ok(0);
        };
        for line in reader.lines() {
            let line = line?;
            if let Some(tour) = codec::decode_tour(&line) {
                let key = id_key(&tour.id);
                if store.contains_key(&key) {
                    tracing::warn!("Skipping duplicate tour id {}", tour.id);
                    continue;
                }
                store.insert(key, tour);
            }
        }
        Ok(store.len())
    }

    /// Rewrite the backing file with the current store contents
    pub fn save_to_source(&self) -> AppResult<()> {
        let lines: Vec<String> = self.read().values().map(codec::encode_tour).collect();
        write_source(&self.path, lines)
    }
}
