//! Compact builders for test family trees.
//!
//! Gramps ids are the upper-cased handles, so `"p1"` is `"P1"`.

use crate::date::GeneaDate;
use crate::models::{Event, EventRef, EventRole, EventType, Family, Handle, Name, Person, Place};
use crate::tree::memory::InMemoryTree;

pub(crate) struct Fixture {
    pub tree: InMemoryTree,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            tree: InMemoryTree::new(),
        }
    }

    pub fn place(&self, handle: &str, title: &str, lat: &str, lon: &str) -> &Self {
        self.tree
            .add_place(Place {
                handle: Handle::new(handle),
                gramps_id: handle.to_uppercase(),
                title: title.to_string(),
                latitude: lat.to_string(),
                longitude: lon.to_string(),
            })
            .unwrap();
        self
    }

    pub fn event(&self, handle: &str, ty: EventType, date: GeneaDate, place: Option<&str>) -> &Self {
        self.tree
            .add_event(Event {
                handle: Handle::new(handle),
                gramps_id: handle.to_uppercase(),
                event_type: ty,
                date,
                place: place.map(Handle::new),
                description: String::new(),
            })
            .unwrap();
        self
    }

    pub fn person(&self, handle: &str, given: &str, events: &[&str], families: &[&str]) -> &Self {
        self.tree
            .add_person(Person {
                handle: Handle::new(handle),
                gramps_id: handle.to_uppercase(),
                name: Name::new(given, "Test"),
                event_refs: events
                    .iter()
                    .map(|e| EventRef::new(*e, EventRole::Primary))
                    .collect(),
                families: families.iter().map(|f| Handle::new(*f)).collect(),
            })
            .unwrap();
        self
    }

    pub fn family(
        &self,
        handle: &str,
        father: Option<&str>,
        mother: Option<&str>,
        children: &[&str],
        events: &[&str],
    ) -> &Self {
        self.tree
            .add_family(Family {
                handle: Handle::new(handle),
                gramps_id: handle.to_uppercase(),
                father: father.map(Handle::new),
                mother: mother.map(Handle::new),
                children: children.iter().map(|c| Handle::new(*c)).collect(),
                event_refs: events
                    .iter()
                    .map(|e| EventRef::new(*e, EventRole::Family))
                    .collect(),
            })
            .unwrap();
        self
    }

    /// Four generations of descent from `root`:
    ///
    /// ```text
    /// root + spouse (f1) ─▶ c1, c2
    /// c1 + d1 (f2)       ─▶ g1
    /// g1 + h1 (f3)       ─▶ gg1
    /// ```
    pub fn descent() -> Self {
        let fx = Self::new();
        fx.person("root", "Root", &[], &["f1"])
            .person("spouse", "Spouse", &[], &["f1"])
            .person("c1", "Child1", &[], &["f2"])
            .person("c2", "Child2", &[], &[])
            .person("d1", "InLaw1", &[], &["f2"])
            .person("g1", "Grand1", &[], &["f3"])
            .person("h1", "InLaw2", &[], &["f3"])
            .person("gg1", "Great1", &[], &[])
            .family("f1", Some("root"), Some("spouse"), &["c1", "c2"], &[])
            .family("f2", Some("c1"), Some("d1"), &["g1"], &[])
            .family("f3", Some("h1"), Some("g1"), &["gg1"], &[]);
        fx
    }
}
