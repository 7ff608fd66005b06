//! Storage Layer - in-memory record store
//!
//! One ordered collection per entity kind:
//! - users(id, username, email)
//! - events(id, title, desc, date, from, to, location_id, user_id)
//! - locations(id, name, desc, lat, lng)
//! - participants(id, user_id, event_id)
//!
//! Seeded from a JSON dataset at startup and discarded on exit.

pub mod collection;
pub mod dataset;
pub mod store;

pub use collection::Collection;
pub use dataset::Dataset;
pub use store::{SharedStore, Store, StoreStats};
