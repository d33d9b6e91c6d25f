//! JSON family-tree files.
//!
//! A tree file is one JSON object with four record arrays:
//!
//! ```json
//! {
//!   "people":   [{ "handle": "p1", "id": "I0001",
//!                  "name": { "given": "Anna", "surname": "Berg" },
//!                  "event_refs": [{ "event": "e1", "role": "primary" }],
//!                  "families": ["f1"] }],
//!   "families": [{ "handle": "f1", "id": "F0001", "father": "p2",
//!                  "mother": "p1", "children": ["p3"], "event_refs": [] }],
//!   "events":   [{ "handle": "e1", "id": "E0001", "type": "Birth",
//!                  "date": { "year": 1850, "month": 3, "day": 12 },
//!                  "place": "pl1" }],
//!   "places":   [{ "handle": "pl1", "id": "P0001", "title": "Oslo",
//!                  "latitude": "59.91", "longitude": "10.75" }]
//! }
//! ```
//!
//! References are not checked when loading. A handle that points nowhere
//! resolves to nothing later and that branch is skipped.

use anyhow::{Context, Result};
use geomoves_core::models::{Event, Family, Person, Place};
use geomoves_core::tree::memory::InMemoryTree;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
pub struct FamilyFile {
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub families: Vec<Family>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub places: Vec<Place>,
}

impl FamilyFile {
    pub fn into_tree(self) -> Result<InMemoryTree> {
        let tree = InMemoryTree::new();
        for place in self.places {
            tree.add_place(place)?;
        }
        for event in self.events {
            tree.add_event(event)?;
        }
        for family in self.families {
            tree.add_family(family)?;
        }
        for person in self.people {
            tree.add_person(person)?;
        }
        Ok(tree)
    }
}

pub fn parse_tree(json: &str) -> Result<InMemoryTree> {
    let file: FamilyFile =
        serde_json::from_str(json).with_context(|| "Failed to parse family tree")?;
    file.into_tree()
}

pub fn load_tree(path: &Path) -> Result<InMemoryTree> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read family tree: {}", path.display()))?;
    let tree = parse_tree(&content)
        .with_context(|| format!("Invalid family tree: {}", path.display()))?;

    let (people, families, events, places) = tree.counts()?;
    tracing::info!(
        path = %path.display(),
        people,
        families,
        events,
        places,
        "family tree loaded"
    );
    Ok(tree)
}
