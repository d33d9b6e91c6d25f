//! Family-tree database abstraction.
//!
//! The [`FamilyTree`] trait is the read-only window the core has onto a
//! genealogical database. The core never writes through it and never owns
//! persistence; the application chooses the backend (an in-memory tree
//! loaded from JSON, or anything else that can answer handle lookups).
//!
//! Lookups return `Ok(None)` when a handle points to nothing. An `Err` is a
//! backend failure. Traversal and extraction treat both as "skip this
//! branch".
//!
//! Implementations must be `Send + Sync` so a tree can be shared with
//! async drivers.

pub mod memory;

use anyhow::Result;

use crate::models::{Event, Family, Handle, Person, Place};

/// Read-only access to a genealogical database.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get_person_from_handle`](FamilyTree::get_person_from_handle) | Resolve a person |
/// | [`get_family_from_handle`](FamilyTree::get_family_from_handle) | Resolve a family |
/// | [`get_event_from_handle`](FamilyTree::get_event_from_handle) | Resolve an event |
/// | [`get_place_from_handle`](FamilyTree::get_place_from_handle) | Resolve a place |
/// | [`get_person_from_gramps_id`](FamilyTree::get_person_from_gramps_id) | Reverse lookup by human id |
/// | [`get_event_from_gramps_id`](FamilyTree::get_event_from_gramps_id) | Reverse lookup by human id |
/// | [`iter_person_handles`](FamilyTree::iter_person_handles) | Enumerate people |
/// | [`iter_family_handles`](FamilyTree::iter_family_handles) | Enumerate families |
pub trait FamilyTree: Send + Sync {
    fn get_person_from_handle(&self, handle: &Handle) -> Result<Option<Person>>;

    fn get_family_from_handle(&self, handle: &Handle) -> Result<Option<Family>>;

    fn get_event_from_handle(&self, handle: &Handle) -> Result<Option<Event>>;

    fn get_place_from_handle(&self, handle: &Handle) -> Result<Option<Place>>;

    fn get_person_from_gramps_id(&self, gramps_id: &str) -> Result<Option<Person>>;

    fn get_event_from_gramps_id(&self, gramps_id: &str) -> Result<Option<Event>>;

    /// All person handles, in a stable order.
    fn iter_person_handles(&self) -> Result<Vec<Handle>>;

    /// All family handles, in a stable order.
    fn iter_family_handles(&self) -> Result<Vec<Handle>>;
}

/// Resolve a lookup, logging and discarding backend failures.
///
/// Turns the two-level `Result<Option<T>>` into the "present or skip" shape
/// the traversal works with.
pub(crate) fn resolve<T>(what: &str, handle: &Handle, lookup: Result<Option<T>>) -> Option<T> {
    match lookup {
        Ok(Some(record)) => Some(record),
        Ok(None) => {
            tracing::debug!(%handle, "{} handle resolves to nothing, skipping", what);
            None
        }
        Err(err) => {
            tracing::warn!(%handle, error = %err, "{} lookup failed, skipping", what);
            None
        }
    }
}
