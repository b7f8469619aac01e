//! Statistics service

use serde::Serialize;

use crate::repository::Repository;

/// One statistics row: booked-tourist total for a single facility
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomestayOccupancy {
    pub homestay_name: String,
    pub total_tourists: u64,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Total tourists per homestay, one row per facility in store order.
    /// Only tours currently marked booked contribute; available or expired
    /// but unbooked tours do not.
    pub fn tourists_per_homestay(&self) -> Vec<HomestayOccupancy> {
        self.repository
            .homestays
            .find_all()
            .into_iter()
            .map(|homestay| {
                let total_tourists = self
                    .repository
                    .tours
                    .find_by_homestay(&homestay.id)
                    .into_iter()
                    .filter(|t| t.booked)
                    .map(|t| u64::from(t.tourist_count))
                    .sum();
                HomestayOccupancy {
                    homestay_name: homestay.name,
                    total_tourists,
                }
            })
            .collect()
    }
}
