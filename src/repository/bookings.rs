//! Booking repository

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use crate::codec;
use crate::error::AppResult;
use crate::models::Booking;

use super::{id_key, open_source, write_source};

#[derive(Clone)]
pub struct BookingRepository {
    inner: Arc<RwLock<IndexMap<String, Booking>>>,
    path: PathBuf,
}

impl BookingRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(IndexMap::new())),
            path: path.into(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, Booking>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, Booking>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// All bookings, cloned out in insertion order
    pub fn find_all(&self) -> Vec<Booking> {
        self.read().values().cloned().collect()
    }

    /// Look up by ID, case-insensitively
    pub fn find_by_id(&self, id: &str) -> Option<Booking> {
        self.read().get(&id_key(id)).cloned()
    }

    /// Insert a new booking; fails (false) if the ID is already taken
    pub fn save(&self, booking: Booking) -> bool {
        let mut store = self.write();
        let key = id_key(&booking.id);
        if store.contains_key(&key) {
            return false;
        }
        store.insert(key, booking);
        true
    }

    /// Replace an existing booking in place; fails (false) if missing
    pub fn update(&self, booking: Booking) -> bool {
        let mut store = self.write();
        match store.get_mut(&id_key(&booking.id)) {
            Some(slot) => {
                *slot = booking;
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

    /// Bookings referencing the given tour
    pub fn find_by_tour(&self, tour_id: &str) -> Vec<Booking> {
        self.read()
            .values()
            .filter(|b| b.tour_id.eq_ignore_ascii_case(tour_id))
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over customer names
    pub fn find_by_customer_name(&self, name: &str) -> Vec<Booking> {
        let needle = name.to_lowercase();
        self.read()
            .values()
            .filter(|b| b.customer_name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Clear the store and reload it from the backing file. Returns the
    /// number of bookings loaded; a missing file yields an empty store.
    pub fn load_from_source(&self) -> AppResult<usize> {
        let mut store = self.write();
        store.clear();
        let Some(reader) = open_source(&self.path)? else {
            return Ok(0);
        };
        for line in reader.lines() {
            let line = line?;
            if let Some(booking) = codec::decode_booking(&line) {
                let key = id_key(&booking.id);
                if store.contains_key(&key) {
                    tracing::warn!("Skipping duplicate booking id {}", booking.id);
                    continue;
                }
                store.insert(key, booking);
            }
        }
        Ok(store.len())
    }

    /// Rewrite the backing file with the current store contents
    pub fn save_to_source(&self) -> AppResult<()> {
        let lines: Vec<String> = self.read().values().map(codec::encode_booking).collect();
        write_source(&self.path, lines)
    }
}
