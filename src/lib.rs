//! # Eventgraph - In-memory GraphQL API for meetups
//!
//! Serves CRUD operations over four related collections:
//! - Users, who organize Events
//! - Events, held at a Location
//! - Locations
//! - Participants, linking a User to an Event
//!
//! State lives in an explicit [`Store`] seeded from a JSON dataset at startup.
//! Nothing is persisted.

pub mod model;
pub mod storage;
pub mod relations;
pub mod server;
pub mod output;
pub mod config;


// Re-exports for convenient access
pub use model::{EntityKind, Event, ForeignKey, Location, Participant, Record, RecordId, User};
pub use storage::{Collection, Dataset, SharedStore, Store, StoreStats};

/// Result type alias for Eventgraph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Eventgraph operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("Dataset error: {0}")]
    Dataset(#[from] serde_json::Error),

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a Not-Found error for the given kind and raw id
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Error::NotFound { kind, id: id.into() }
    }

    /// Whether this error means "no record with that id"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
