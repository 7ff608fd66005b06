//! Relationship resolution - joins across collections by foreign key
//!
//! Each resolver is a pure read over the store, run only when the
//! relationship is actually requested. A dangling or malformed key resolves
//! to `None` or an empty list, never an error.

use crate::model::{Event, Location, Participant, User};
use crate::storage::Store;

/// Events organized by a user, in insertion order
pub fn user_events<'a>(store: &'a Store, user: &User) -> Vec<&'a Event> {
    store
        .events
        .iter()
        .filter(|e| e.user_id.points_to(user.id))
        .collect()
}

/// Where an event takes place
pub fn event_location<'a>(store: &'a Store, event: &Event) -> Option<&'a Location> {
    event.location_id.target().and_then(|id| store.locations.find(id))
}

/// Who organizes an event
pub fn event_user<'a>(store: &'a Store, event: &Event) -> Option<&'a User> {
    event.user_id.target().and_then(|id| store.users.find(id))
}

/// Participants registered for an event
pub fn event_participants<'a>(store: &'a Store, event: &Event) -> Vec<&'a Participant> {
    store
        .participants
        .iter()
        .filter(|p| p.event_id.points_to(event.id))
        .collect()
}

/// Events held at a location
pub fn location_events<'a>(store: &'a Store, location: &Location) -> Vec<&'a Event> {
    store
        .events
        .iter()
        .filter(|e| e.location_id.points_to(location.id))
        .collect()
}

pub fn participant_user<'a>(store: &'a Store, participant: &Participant) -> Option<&'a User> {
    participant.user_id.target().and_then(|id| store.users.find(id))
}

pub fn participant_event<'a>(store: &'a Store, participant: &Participant) -> Option<&'a Event> {
    participant.event_id.target().and_then(|id| store.events.find(id))
}
