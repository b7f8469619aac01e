//! Repository layer: one in-memory ordered store per entity type, loaded
//! from and saved to line-oriented text files.
//!
//! Persistence cadence is explicit: mutating operations touch memory only,
//! and [`Repository::flush`] rewrites the backing files in one pass.

pub mod bookings;
pub mod homestays;
pub mod tours;

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use crate::config::StorageConfig;
use crate::error::AppResult;

/// Main repository struct holding the three entity stores
#[derive(Clone)]
pub struct Repository {
    pub homestays: homestays::HomestayRepository,
    pub tours: tours::TourRepository,
    pub bookings: bookings::BookingRepository,
}

impl Repository {
    /// Create a new repository backed by the configured data files
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            homestays: homestays::HomestayRepository::new(&storage.homestays_file),
            tours: tours::TourRepository::new(&storage.tours_file),
            bookings: bookings::BookingRepository::new(&storage.bookings_file),
        }
    }

    /// Load all three stores from their backing files. Missing files yield
    /// empty stores; malformed lines are logged and skipped.
    pub fn load_all(&self) -> AppResult<()> {
        let homestays = self.homestays.load_from_source()?;
        let tours = self.tours.load_from_source()?;
        let bookings = self.bookings.load_from_source()?;
        tracing::info!(
            "Loaded {} homestays, {} tours, {} bookings",
            homestays,
            tours,
            bookings
        );
        Ok(())
    }

    /// Rewrite every backing file with the canonical encoding of the
    /// current in-memory state
    pub fn flush(&self) -> AppResult<()> {
        self.homestays.save_to_source()?;
        self.tours.save_to_source()?;
        self.bookings.save_to_source()?;
        Ok(())
    }
}

/// Open a backing file for line-by-line reading. A missing file is not an
/// error: it reads as an empty store.
pub(crate) fn open_source(path: &Path) -> AppResult<Option<BufReader<File>>> {
    match File::open(path) {
        Ok(file) => Ok(Some(BufReader::new(file))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No backing file at {}, starting empty", path.display());
            Ok(None)
        }
        Err(e) => {
            tracing::error!("Failed to open {}: {}", path.display(), e);
            Err(e.into())
        }
    }
}

/// Fully overwrite a backing file, one encoded line per entity
pub(crate) fn write_source<I>(path: &Path, lines: I) -> AppResult<()>
where
    I: IntoIterator<Item = String>,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path).map_err(|e| {
        tracing::error!("Failed to write {}: {}", path.display(), e);
        e
    })?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

/// Normalized store key: entity IDs compare case-insensitively
pub(crate) fn id_key(id: &str) -> String {
    id.trim().to_ascii_uppercase()
}
