//! Record types - the four entity kinds and their input shapes
//!
//! Every record carries a [`RecordId`] assigned by its collection.
//! References to other records are kept as [`ForeignKey`]s, which are
//! stored as supplied and only interpreted when a relationship is joined.

use crate::storage::{Collection, Store};
use async_graphql::{InputObject, MaybeUndefined, ID};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Interpret a client-supplied id by its numeric value, so `"1"`,
    /// `"1.0"` and `"1e0"` all name record 1. Anything that is not a
    /// non-negative whole number matches no record.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(id) = raw.parse::<u64>() {
            return Some(Self(id));
        }

        let value = raw.parse::<f64>().ok()?;
        let whole = value.is_finite() && value.fract() == 0.0;
        // u64::MAX as f64 rounds up to 2^64, which is already out of range.
        if whole && value >= 0.0 && value < u64::MAX as f64 {
            Some(Self(value as u64))
        } else {
            None
        }
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A reference from one record to another, kept verbatim.
///
/// Dangling or malformed keys are allowed; they simply join to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ForeignKey(String);

impl ForeignKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id this key points at, if it is well-formed
    pub fn target(&self) -> Option<RecordId> {
        RecordId::parse(&self.0)
    }

    pub fn points_to(&self, id: RecordId) -> bool {
        self.target() == Some(id)
    }
}

impl From<RecordId> for ForeignKey {
    fn from(id: RecordId) -> Self {
        Self(id.to_string())
    }
}

impl From<ID> for ForeignKey {
    fn from(id: ID) -> Self {
        Self(id.0)
    }
}

impl<'de> Deserialize<'de> for ForeignKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Datasets write keys as numbers; clients send them as strings.
        // Anything else is kept as its JSON text and joins to nothing.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
            Other(serde_json::Value),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
            Raw::Other(value) => Self(value.to_string()),
        })
    }
}

/// The four kinds of stored entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    User,
    Event,
    Location,
    Participant,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Event => "Event",
            EntityKind::Location => "Location",
            EntityKind::Participant => "Participant",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A record kind the generic CRUD engine can operate on.
///
/// `Create` carries the fields needed to build a new record; `Patch` carries
/// the optional fields an update may overwrite.
pub trait Record: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    type Create: Send;
    type Patch: Send;

    fn id(&self) -> RecordId;

    /// Build a new record from its input and a freshly assigned id
    fn create(id: RecordId, data: Self::Create) -> Self;

    /// Shallow merge: overwrite supplied fields, keep everything else
    fn merge(&mut self, patch: Self::Patch);

    fn collection(store: &Store) -> &Collection<Self>;

    fn collection_mut(store: &mut Store) -> &mut Collection<Self>;
}

/// Apply a nullable-field patch: a value overwrites, an explicit null clears,
/// an absent field leaves the current value alone.
fn merge_optional<T>(field: &mut Option<T>, patch: MaybeUndefined<T>) {
    match patch {
        MaybeUndefined::Value(value) => *field = Some(value),
        MaybeUndefined::Null => *field = None,
        MaybeUndefined::Undefined => {}
    }
}

fn merge_required<T>(field: &mut T, patch: Option<T>) {
    if let Some(value) = patch {
        *field = value;
    }
}

// ========== User ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl Record for User {
    const KIND: EntityKind = EntityKind::User;

    type Create = CreateUserInput;
    type Patch = UpdateUserInput;

    fn id(&self) -> RecordId {
        self.id
    }

    fn create(id: RecordId, data: CreateUserInput) -> Self {
        Self {
            id,
            username: data.username,
            email: data.email,
        }
    }

    fn merge(&mut self, patch: UpdateUserInput) {
        merge_required(&mut self.username, patch.username);
        merge_required(&mut self.email, patch.email);
    }

    fn collection(store: &Store) -> &Collection<Self> {
        &store.users
    }

    fn collection_mut(store: &mut Store) -> &mut Collection<Self> {
        &mut store.users
    }
}

// ========== Event ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: RecordId,
    pub title: String,
    pub desc: Option<String>,
    pub date: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub location_id: ForeignKey,
    pub user_id: ForeignKey,
}

#[derive(Debug, Clone, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct CreateEventInput {
    pub title: String,
    pub desc: Option<String>,
    pub date: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub location_id: ID,
    pub user_id: ID,
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct UpdateEventInput {
    pub title: Option<String>,
    pub desc: MaybeUndefined<String>,
    pub date: MaybeUndefined<String>,
    pub from: MaybeUndefined<String>,
    pub to: MaybeUndefined<String>,
    pub location_id: Option<ID>,
    pub user_id: Option<ID>,
}

impl Record for Event {
    const KIND: EntityKind = EntityKind::Event;

    type Create = CreateEventInput;
    type Patch = UpdateEventInput;

    fn id(&self) -> RecordId {
        self.id
    }

    fn create(id: RecordId, data: CreateEventInput) -> Self {
        Self {
            id,
            title: data.title,
            desc: data.desc,
            date: data.date,
            from: data.from,
            to: data.to,
            location_id: data.location_id.into(),
            user_id: data.user_id.into(),
        }
    }

    fn merge(&mut self, patch: UpdateEventInput) {
        merge_required(&mut self.title, patch.title);
        merge_optional(&mut self.desc, patch.desc);
        merge_optional(&mut self.date, patch.date);
        merge_optional(&mut self.from, patch.from);
        merge_optional(&mut self.to, patch.to);
        merge_required(&mut self.location_id, patch.location_id.map(Into::into));
        merge_required(&mut self.user_id, patch.user_id.map(Into::into));
    }

    fn collection(store: &Store) -> &Collection<Self> {
        &store.events
    }

    fn collection_mut(store: &mut Store) -> &mut Collection<Self> {
        &mut store.events
    }
}

// ========== Location ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: RecordId,
    pub name: String,
    pub desc: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct CreateLocationInput {
    pub name: String,
    pub desc: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct UpdateLocationInput {
    pub name: Option<String>,
    pub desc: MaybeUndefined<String>,
    pub lat: MaybeUndefined<f64>,
    pub lng: MaybeUndefined<f64>,
}

impl Record for Location {
    const KIND: EntityKind = EntityKind::Location;

    type Create = CreateLocationInput;
    type Patch = UpdateLocationInput;

    fn id(&self) -> RecordId {
        self.id
    }

    fn create(id: RecordId, data: CreateLocationInput) -> Self {
        Self {
            id,
            name: data.name,
            desc: data.desc,
            lat: data.lat,
            lng: data.lng,
        }
    }

    fn merge(&mut self, patch: UpdateLocationInput) {
        merge_required(&mut self.name, patch.name);
        merge_optional(&mut self.desc, patch.desc);
        merge_optional(&mut self.lat, patch.lat);
        merge_optional(&mut self.lng, patch.lng);
    }

    fn collection(store: &Store) -> &Collection<Self> {
        &store.locations
    }

    fn collection_mut(store: &mut Store) -> &mut Collection<Self> {
        &mut store.locations
    }
}

// ========== Participant ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: RecordId,
    pub user_id: ForeignKey,
    pub event_id: ForeignKey,
}

#[derive(Debug, Clone, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct CreateParticipantInput {
    pub user_id: ID,
    pub event_id: ID,
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct UpdateParticipantInput {
    pub user_id: Option<ID>,
    pub event_id: Option<ID>,
}

impl Record for Participant {
    const KIND: EntityKind = EntityKind::Participant;

    type Create = CreateParticipantInput;
    type Patch = UpdateParticipantInput;

    fn id(&self) -> RecordId {
        self.id
    }

    fn create(id: RecordId, data: CreateParticipantInput) -> Self {
        Self {
            id,
            user_id: data.user_id.into(),
            event_id: data.event_id.into(),
        }
    }

    fn merge(&mut self, patch: UpdateParticipantInput) {
        merge_required(&mut self.user_id, patch.user_id.map(Into::into));
        merge_required(&mut self.event_id, patch.event_id.map(Into::into));
    }

    fn collection(store: &Store) -> &Collection<Self> {
        &store.participants
    }

    fn collection_mut(store: &mut Store) -> &mut Collection<Self> {
        &mut store.participants
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_parse() {
        assert_eq!(RecordId::parse("7"), Some(RecordId::new(7)));
        assert_eq!(RecordId::parse(" 12 "), Some(RecordId::new(12)));
        assert_eq!(RecordId::parse("abc"), None);
        assert_eq!(RecordId::parse("-1"), None);
        assert_eq!(RecordId::parse(""), None);
        assert_eq!(RecordId::parse("01"), Some(RecordId::new(1)));
        assert_eq!(RecordId::parse("+1"), Some(RecordId::new(1)));
    }

    #[test]
    fn test_record_id_parse_numeric_forms() {
        assert_eq!(RecordId::parse("1.0"), Some(RecordId::new(1)));
        assert_eq!(RecordId::parse("1e0"), Some(RecordId::new(1)));
        assert_eq!(RecordId::parse("2.5e1"), Some(RecordId::new(25)));
        assert_eq!(RecordId::parse("1.5"), None);
        assert_eq!(RecordId::parse("-2.0"), None);
        assert_eq!(RecordId::parse("NaN"), None);
        assert_eq!(RecordId::parse("inf"), None);
        assert_eq!(RecordId::parse("1e30"), None);
    }

    #[test]
    fn test_foreign_key_accepts_numbers_and_strings() {
        let from_number: ForeignKey = serde_json::from_str("3").unwrap();
        let from_text: ForeignKey = serde_json::from_str("\"3\"").unwrap();
        let garbage: ForeignKey = serde_json::from_str("\"x3\"").unwrap();

        assert!(from_number.points_to(RecordId::new(3)));
        assert!(from_text.points_to(RecordId::new(3)));
        assert_eq!(garbage.target(), None);
        assert_eq!(garbage.as_str(), "x3");
    }

    #[test]
    fn test_foreign_key_keeps_odd_json_values() {
        let negative: ForeignKey = serde_json::from_str("-1").unwrap();
        let null: ForeignKey = serde_json::from_str("null").unwrap();
        let float: ForeignKey = serde_json::from_str("2.0").unwrap();

        assert_eq!(negative.as_str(), "-1");
        assert_eq!(negative.target(), None);
        assert_eq!(null.target(), None);
        assert!(float.points_to(RecordId::new(2)));
    }

    #[test]
    fn test_entity_kind_names_used_in_errors() {
        assert_eq!(EntityKind::Participant.to_string(), "Participant");
        assert_eq!(
            crate::Error::not_found(EntityKind::Location, "9").to_string(),
            "Location not found: 9"
        );
    }

    #[test]
    fn test_event_merge_preserves_absent_fields() {
        let mut event = Event {
            id: RecordId::new(1),
            title: "Standup".into(),
            desc: Some("daily".into()),
            date: Some("2024-05-01".into()),
            from: None,
            to: None,
            location_id: RecordId::new(2).into(),
            user_id: RecordId::new(3).into(),
        };

        event.merge(UpdateEventInput {
            title: Some("Retro".into()),
            desc: MaybeUndefined::Null,
            to: MaybeUndefined::Value("18:00".into()),
            ..Default::default()
        });

        assert_eq!(event.title, "Retro");
        assert_eq!(event.desc, None);
        assert_eq!(event.date.as_deref(), Some("2024-05-01"));
        assert_eq!(event.to.as_deref(), Some("18:00"));
        assert!(event.location_id.points_to(RecordId::new(2)));
        assert!(event.user_id.points_to(RecordId::new(3)));
    }
}
