//! Seed dataset loading

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::{Error, Result};
use crate::model::{Event, Location, Participant, Record, User};

/// Dataset compiled into the binary
const BUNDLED: &str = include_str!("../../data/dataset.json");

/// Raw records per entity kind, as read from a JSON document.
///
/// Any of the four arrays may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub users: Vec<User>,
    pub events: Vec<Event>,
    pub locations: Vec<Location>,
    pub participants: Vec<Participant>,
}

impl Dataset {
    /// The dataset shipped with the binary
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let dataset: Self = serde_json::from_str(json)?;
        dataset.check_ids()?;
        Ok(dataset)
    }

    /// The largest id is reserved so a collection can always hand out the next one
    fn check_ids(&self) -> Result<()> {
        check_kind(&self.users)?;
        check_kind(&self.events)?;
        check_kind(&self.locations)?;
        check_kind(&self.participants)
    }

    /// Read a dataset from a JSON file
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

fn check_kind<R: Record>(records: &[R]) -> Result<()> {
    match records.iter().find(|r| r.id().get() == u64::MAX) {
        Some(record) => Err(Error::InvalidDataset(format!(
            "{} id {} is out of range",
            R::KIND,
            record.id()
        ))),
        None => Ok(()),
    }
}
