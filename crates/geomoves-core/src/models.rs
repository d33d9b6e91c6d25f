//! Core data models used throughout GeoMoves.
//!
//! These types mirror the records of a genealogical database (people,
//! families, events, places) plus the [`Mark`] value produced for every
//! geocoded life event. Records are plain data: relationships are expressed
//! through [`Handle`]s and resolved through a [`FamilyTree`](crate::tree::FamilyTree).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::date::{GeneaDate, YearKey};

/// Opaque, stable identifier of a database record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Handle {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Handle {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A person's primary name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    #[serde(default)]
    pub given: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub suffix: String,
}

impl Name {
    pub fn new(given: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            given: given.into(),
            surname: surname.into(),
            suffix: String::new(),
        }
    }
}

/// Reference from a person or family to one of its events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRef {
    #[serde(rename = "event")]
    pub handle: Handle,
    #[serde(default)]
    pub role: EventRole,
}

impl EventRef {
    pub fn new(handle: impl Into<Handle>, role: EventRole) -> Self {
        Self {
            handle: handle.into(),
            role,
        }
    }
}

/// A person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub handle: Handle,
    /// Human-stable identifier (e.g. `I0001`).
    #[serde(rename = "id")]
    pub gramps_id: String,
    #[serde(default)]
    pub name: Name,
    #[serde(default)]
    pub event_refs: Vec<EventRef>,
    /// Families in which this person is a parent. The first one is primary.
    #[serde(default)]
    pub families: Vec<Handle>,
}

impl Person {
    pub fn primary_family(&self) -> Option<&Handle> {
        self.families.first()
    }
}

/// A family unit: up to two parents, ordered children, and shared events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub handle: Handle,
    #[serde(rename = "id")]
    pub gramps_id: String,
    #[serde(default)]
    pub father: Option<Handle>,
    #[serde(default)]
    pub mother: Option<Handle>,
    #[serde(default)]
    pub children: Vec<Handle>,
    #[serde(default)]
    pub event_refs: Vec<EventRef>,
}

impl Family {
    pub fn has_event(&self, event: &Handle) -> bool {
        self.event_refs.iter().any(|r| &r.handle == event)
    }
}

/// A life event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub handle: Handle,
    #[serde(rename = "id")]
    pub gramps_id: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default)]
    pub date: GeneaDate,
    #[serde(default)]
    pub place: Option<Handle>,
    #[serde(default)]
    pub description: String,
}

/// A place. Coordinates are free-form strings exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub handle: Handle,
    #[serde(rename = "id")]
    pub gramps_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
}

/// Event classification. Unknown names are kept verbatim as [`EventType::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Birth,
    Baptism,
    Christening,
    Marriage,
    Divorce,
    Residence,
    Occupation,
    Emigration,
    Immigration,
    Census,
    Death,
    Burial,
    Custom(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Birth => "Birth",
            EventType::Baptism => "Baptism",
            EventType::Christening => "Christening",
            EventType::Marriage => "Marriage",
            EventType::Divorce => "Divorce",
            EventType::Residence => "Residence",
            EventType::Occupation => "Occupation",
            EventType::Emigration => "Emigration",
            EventType::Immigration => "Immigration",
            EventType::Census => "Census",
            EventType::Death => "Death",
            EventType::Burial => "Burial",
            EventType::Custom(name) => name,
        }
    }
}

impl From<String> for EventType {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "birth" => EventType::Birth,
            "baptism" => EventType::Baptism,
            "christening" => EventType::Christening,
            "marriage" => EventType::Marriage,
            "divorce" => EventType::Divorce,
            "residence" => EventType::Residence,
            "occupation" => EventType::Occupation,
            "emigration" => EventType::Emigration,
            "immigration" => EventType::Immigration,
            "census" => EventType::Census,
            "death" => EventType::Death,
            "burial" => EventType::Burial,
            _ => EventType::Custom(value),
        }
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an event relates to the record referencing it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventRole {
    /// The event belongs to the person directly.
    #[default]
    Primary,
    /// The event belongs to the family unit.
    Family,
    Witness,
    Custom(String),
}

impl EventRole {
    pub fn as_str(&self) -> &str {
        match self {
            EventRole::Primary => "Primary",
            EventRole::Family => "Family",
            EventRole::Witness => "Witness",
            EventRole::Custom(name) => name,
        }
    }
}

impl From<String> for EventRole {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "primary" => EventRole::Primary,
            "family" => EventRole::Family,
            "witness" => EventRole::Witness,
            _ => EventRole::Custom(value),
        }
    }
}

impl From<EventRole> for String {
    fn from(value: EventRole) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for EventRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One geocoded, dated, described life event ready for map rendering.
///
/// Only built when both coordinates normalized successfully. Two marks are
/// the same mark only when every field matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mark {
    /// Place title, used to group marks by location.
    pub place_title: String,
    pub event_type: EventType,
    /// Gramps id of the person the mark was extracted for.
    pub person_id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// `"<type> : <name>"` for personal events, `"<father> - <mother>"` for family events.
    pub descriptor: String,
    pub year_key: YearKey,
    pub place_id: String,
    pub event_id: String,
    pub role: EventRole,
}

/// A place referenced by an event that has no usable coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingCoordinates {
    pub place_id: String,
    pub title: String,
}
