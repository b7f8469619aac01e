//! Homestay repository

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use crate::codec;
use crate::error::AppResult;
use crate::models::Homestay;

use super::{id_key, open_source, write_source};

#[derive(Clone)]
pub struct HomestayRepository {
    inner: Arc<RwLock<IndexMap<String, Homestay>>>,
    path: PathBuf,
}

impl HomestayRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(IndexMap::new())),
            path: path.into(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, Homestay>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, Homestay>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// All homestays, cloned out in insertion order
    pub fn find_all(&self) -> Vec<Homestay> {
        self.read().values().cloned().collect()
    }

    /// Look up by ID, case-insensitively
    pub fn find_by_id(&self, id: &str) -> Option<Homestay> {
        self.read().get(&id_key(id)).cloned()
    }

    /// Insert a new homestay; fails (false) if the ID is already taken
    pub fn save(&self, homestay: Homestay) -> bool {
        let mut store = self.write();
        let key = id_key(&homestay.id);
        if store.contains_key(&key) {
            return false;
        }
        store.insert(key, homestay);
        true
    }

    /// Replace an existing homestay in place; fails (false) if missing
    pub fn update(&self, homestay: Homestay) -> bool {
        let mut store = self.write();
        match store.get_mut(&id_key(&homestay.id)) {
            Some(slot) => {
                *slot = homestay;
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

    /// Case-insensitive substring search over homestay names
    pub fn find_by_name(&self, name: &str) -> Vec<Homestay> {
        let needle = name.to_lowercase();
        self.read()
            .values()
            .filter(|h| h.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Clear the store and reload it from the backing file. Returns the
    /// number of homestays loaded; a missing file yields an empty store.
    pub fn load_from_source(&self) -> AppResult<usize> {
        let mut store = self.write();
        store.clear();
        let Some(reader) = open_source(&self.path)? else {
            return Ok(0);
        };
        for line in reader.lines() {
            let line = line?;
            if let Some(homestay) = codec::decode_homestay(&line) {
                let key = id_key(&homestay.id);
                if store.contains_key(&key) {
                    tracing::warn!("Skipping duplicate homestay id {}", homestay.id);
                    continue;
                }
                store.insert(key, homestay);
            }
        }
        Ok(store.len())
    }

    /// Rewrite the backing file with the current store contents
    pub fn save_to_source(&self) -> AppResult<()> {
        let lines: Vec<String> = self.read().values().map(codec::encode_homestay).collect();
        write_source(&self.path, lines)
    }
}
