//! In-memory [`FamilyTree`] implementation for tests and file-backed trees.
//!
//! Uses `HashMap`s behind `std::sync::RwLock` for thread safety, plus
//! insertion-ordered handle lists so enumeration is deterministic.
//! References between records are not validated: a dangling handle simply
//! resolves to nothing.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, Result};

use crate::models::{Event, Family, Handle, Person, Place};

use super::FamilyTree;

#[derive(Debug, Default)]
struct Records {
    people: HashMap<Handle, Person>,
    families: HashMap<Handle, Family>,
    events: HashMap<Handle, Event>,
    places: HashMap<Handle, Place>,
    person_order: Vec<Handle>,
    family_order: Vec<Handle>,
    person_ids: HashMap<String, Handle>,
    event_ids: HashMap<String, Handle>,
}

/// In-memory family tree.
#[derive(Debug, Default)]
pub struct InMemoryTree {
    records: RwLock<Records>,
}

impl InMemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Records>> {
        self.records
            .read()
            .map_err(|_| anyhow!("family tree lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Records>> {
        self.records
            .write()
            .map_err(|_| anyhow!("family tree lock poisoned"))
    }

    /// Insert or replace a person.
    pub fn add_person(&self, person: Person) -> Result<()> {
        let mut records = self.write()?;
        if !records.people.contains_key(&person.handle) {
            records.person_order.push(person.handle.clone());
        }
        records
            .person_ids
            .insert(person.gramps_id.clone(), person.handle.clone());
        records.people.insert(person.handle.clone(), person);
        Ok(())
    }

    /// Insert or replace a family.
    pub fn add_family(&self, family: Family) -> Result<()> {
        let mut records = self.write()?;
        if !records.families.contains_key(&family.handle) {
            records.family_order.push(family.handle.clone());
        }
        records.families.insert(family.handle.clone(), family);
        Ok(())
    }

    /// Insert or replace an event.
    pub fn add_event(&self, event: Event) -> Result<()> {
        let mut records = self.write()?;
        records
            .event_ids
            .insert(event.gramps_id.clone(), event.handle.clone());
        records.events.insert(event.handle.clone(), event);
        Ok(())
    }

    /// Insert or replace a place.
    pub fn add_place(&self, place: Place) -> Result<()> {
        let mut records = self.write()?;
        records.places.insert(place.handle.clone(), place);
        Ok(())
    }

    /// Number of people, families, events and places stored.
    pub fn counts(&self) -> Result<(usize, usize, usize, usize)> {
        let records = self.read()?;
        Ok((
            records.people.len(),
            records.families.len(),
            records.events.len(),
            records.places.len(),
        ))
    }
}

impl FamilyTree for InMemoryTree {
    fn get_person_from_handle(&self, handle: &Handle) -> Result<Option<Person>> {
        Ok(self.read()?.people.get(handle).cloned())
    }

    fn get_family_from_handle(&self, handle: &Handle) -> Result<Option<Family>> {
        Ok(self.read()?.families.get(handle).cloned())
    }

    fn get_event_from_handle(&self, handle: &Handle) -> Result<Option<Event>> {
        Ok(self.read()?.events.get(handle).cloned())
    }

    fn get_place_from_handle(&self, handle: &Handle) -> Result<Option<Place>> {
        Ok(self.read()?.places.get(handle).cloned())
    }

    fn get_person_from_gramps_id(&self, gramps_id: &str) -> Result<Option<Person>> {
        let records = self.read()?;
        Ok(records
            .person_ids
            .get(gramps_id)
            .and_then(|h| records.people.get(h))
            .cloned())
    }

    fn get_event_from_gramps_id(&self, gramps_id: &str) -> Result<Option<Event>> {
        let records = self.read()?;
        Ok(records
            .event_ids
            .get(gramps_id)
            .and_then(|h| records.events.get(h))
            .cloned())
    }

    fn iter_person_handles(&self) -> Result<Vec<Handle>> {
        Ok(self.read()?.person_order.clone())
    }

    fn iter_family_handles(&self) -> Result<Vec<Handle>> {
        Ok(self.read()?.family_order.clone())
    }
}
