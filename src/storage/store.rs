//! The record store and the generic CRUD entry points

use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::Result;
use crate::model::{Event, Location, Participant, Record, User};
use super::collection::Collection;
use super::dataset::Dataset;

/// Store shared between request handlers.
///
/// Writers hold the lock for one CRUD call, so operations never interleave.
pub type SharedStore = Arc<RwLock<Store>>;

/// All four record collections.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub users: Collection<User>,
    pub events: Collection<Event>,
    pub locations: Collection<Location>,
    pub participants: Collection<Participant>,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self {
            users: Collection::from_records(dataset.users),
            events: Collection::from_records(dataset.events),
            locations: Collection::from_records(dataset.locations),
            participants: Collection::from_records(dataset.participants),
        }
    }

    /// Store seeded with the dataset compiled into the binary
    pub fn load_bundled() -> Result<Self> {
        Ok(Self::from_dataset(Dataset::bundled()?))
    }

    /// Store seeded from a JSON dataset file
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_dataset(Dataset::from_path(path)?))
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    // ========== Generic CRUD ==========

    pub fn list<R: Record>(&self) -> &[R] {
        R::collection(self).list()
    }

    pub fn get<R: Record>(&self, raw_id: &str) -> Result<&R> {
        R::collection(self).get(raw_id)
    }

    pub fn create<R: Record>(&mut self, data: R::Create) -> R {
        let record = R::collection_mut(self).create(data);
        tracing::debug!(kind = %R::KIND, id = %record.id(), "created record");
        record
    }

    pub fn update<R: Record>(&mut self, raw_id: &str, patch: R::Patch) -> Result<R> {
        let record = R::collection_mut(self).update(raw_id, patch)?;
        tracing::debug!(kind = %R::KIND, id = %record.id(), "updated record");
        Ok(record)
    }

    pub fn delete<R: Record>(&mut self, raw_id: &str) -> Result<R> {
        let record = R::collection_mut(self).delete(raw_id)?;
        tracing::debug!(kind = %R::KIND, id = %record.id(), "deleted record");
        Ok(record)
    }

    pub fn delete_all<R: Record>(&mut self) -> usize {
        let count = R::collection_mut(self).delete_all();
        tracing::debug!(kind = %R::KIND, count, "deleted all records");
        count
    }

    /// Record counts per collection
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            users: self.users.len(),
            events: self.events.len(),
            locations: self.locations.len(),
            participants: self.participants.len(),
        }
    }
}

/// Number of records held in each collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct StoreStats {
    pub users: usize,
    pub events: usize,
    pub locations: usize,
    pub participants: usize,
}

impl StoreStats {
    pub fn total(&self) -> usize {
        self.users + self.events + self.locations + self.participants
    }
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Store Statistics:")?;
        writeln!(f, "  Users: {}", self.users)?;
        writeln!(f, "  Events: {}", self.events)?;
        writeln!(f, "  Locations: {}", self.locations)?;
        writeln!(f, "  Participants: {}", self.participants)?;
        write!(f, "  Total: {}", self.total())
    }
}
