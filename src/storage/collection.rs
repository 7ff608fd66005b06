//! Generic CRUD over one ordered sequence of records

use crate::model::{Record, RecordId};
use crate::{Error, Result};

/// Ordered, in-memory sequence of records of one kind.
///
/// Ids come from a per-collection counter that only moves forward, so an id
/// is never handed out twice, even after deletes.
#[derive(Debug, Clone)]
pub struct Collection<R> {
    records: Vec<R>,
    next_id: u64,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }
}

impl<R: Record> Collection<R> {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing records, keeping their order and ids.
    ///
    /// The counter starts past the largest id present.
    pub fn from_records(records: Vec<R>) -> Self {
        let next_id = records
            .iter()
            .map(|r| r.id().get())
            .max()
            .map_or(1, |max| max.saturating_add(1));
        Self { records, next_id }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in insertion order
    pub fn list(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    /// First record with the given id
    pub fn find(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Look up a record by a client-supplied id; non-numeric ids match nothing
    pub fn find_raw(&self, raw_id: &str) -> Option<&R> {
        RecordId::parse(raw_id).and_then(|id| self.find(id))
    }

    /// Like [`Collection::find_raw`], but a miss is an error
    pub fn get(&self, raw_id: &str) -> Result<&R> {
        self.find_raw(raw_id)
            .ok_or_else(|| Error::not_found(R::KIND, raw_id))
    }

    fn position(&self, raw_id: &str) -> Result<usize> {
        RecordId::parse(raw_id)
            .and_then(|id| self.records.iter().position(|r| r.id() == id))
            .ok_or_else(|| Error::not_found(R::KIND, raw_id))
    }

    /// Append a new record built from `data`
    pub fn create(&mut self, data: R::Create) -> R {
        let id = RecordId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);

        let record = R::create(id, data);
        self.records.push(record.clone());
        record
    }

    /// Shallow-merge `patch` onto the record with `raw_id`
    pub fn update(&mut self, raw_id: &str, patch: R::Patch) -> Result<R> {
        let index = self.position(raw_id)?;
        let record = &mut self.records[index];
        record.merge(patch);
        Ok(record.clone())
    }

    /// Remove the record with `raw_id`, returning what was stored
    pub fn delete(&mut self, raw_id: &str) -> Result<R> {
        let index = self.position(raw_id)?;
        Ok(self.records.remove(index))
    }

    /// Remove everything; returns how many records were dropped
    pub fn delete_all(&mut self) -> usize {
        let count = self.records.len();
        self.records.clear();
        count
    }
}
