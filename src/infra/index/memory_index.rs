use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{
    EventEntry, EventIndex, EventQuery, EventRepository, VenueEntry, VenueIndex, VenueQuery,
    VenueRepository,
};
use crate::error::AppError;

/// Linear-scan index over a periodically refreshed snapshot of the venue
/// table. The snapshot is swapped wholesale under a write lock; searches
/// take the read lock and never block each other.
pub struct MemoryVenueIndex {
    entries: RwLock<Vec<VenueEntry>>,
}

impl MemoryVenueIndex {
    pub fn new() -> Self {
        Self { entries: RwLock::new(Vec::new()) }
    }
}

impl Default for MemoryVenueIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_venue(entry: &VenueEntry, query: &VenueQuery) -> bool {
    query.owner.admits(&entry.owner_id)
        && query.latitude.contains(entry.latitude)
        && query.longitude.contains(entry.longitude)
        && query.private.admits(&entry.private)
        && query.category.admits(&entry.category)
}

#[async_trait]
impl VenueIndex for MemoryVenueIndex {
    fn search(&self, limit: usize, query: &VenueQuery) -> Vec<String> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries
            .iter()
            .filter(|e| matches_venue(e, query))
            .take(limit)
            .map(|e| e.id.clone())
            .collect()
    }

    fn len(&self) -> usize {
        match self.entries.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    async fn refresh(&self, repo: &dyn VenueRepository) -> Result<usize, AppError> {
        let fresh = repo.list_index_entries().await?;
        let count = fresh.len();
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *entries = fresh;
        Ok(count)
    }
}

pub struct MemoryEventIndex {
    entries: RwLock<Vec<EventEntry>>,
}

impl MemoryEventIndex {
    pub fn new() -> Self {
        Self { entries: RwLock::new(Vec::new()) }
    }
}

impl Default for MemoryEventIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_event(entry: &EventEntry, query: &EventQuery) -> bool {
    query.organizer.admits(&entry.organizer_id)
        && query.latitude.contains(entry.latitude)
        && query.longitude.contains(entry.longitude)
        && query.private.admits(&entry.private)
        && query.category.admits(&entry.category)
        && query.start.contains(entry.start)
}

#[async_trait]
impl EventIndex for MemoryEventIndex {
    fn search(&self, limit: usize, query: &EventQuery) -> Vec<String> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries
            .iter()
            .filter(|e| matches_event(e, query))
            .take(limit)
            .map(|e| e.id.clone())
            .collect()
    }

    fn len(&self) -> usize {
        match self.entries.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    async fn refresh(&self, repo: &dyn EventRepository) -> Result<usize, AppError> {
        let fresh = repo.list_index_entries().await?;
        let count = fresh.len();
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *entries = fresh;
        Ok(count)
    }
}
